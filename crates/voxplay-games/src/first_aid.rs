//! First-aid trainer content

use crate::steps::{StepDefinition, StepTrainer};

pub fn steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new(
            "check the area",
            "Make sure the scene is safe for you and the injured person before approaching.",
            &["your eyes", "calm head"],
            "area is safe",
        ),
        StepDefinition::new(
            "wash your hands",
            "Wash thoroughly with soap, or use sanitizer, before touching the wound.",
            &["soap", "clean water", "hand sanitizer"],
            "hands are clean",
        ),
        StepDefinition::new(
            "clean the wound",
            "Rinse the wound under running water and gently remove any dirt.",
            &["clean water", "sterile gauze"],
            "wound is clean",
        ),
        StepDefinition::new(
            "apply the bandage",
            "Cover the wound with a sterile pad and wrap the bandage snugly, not tight.",
            &["sterile pad", "roller bandage", "tape"],
            "bandage is on",
        ),
        StepDefinition::new(
            "check circulation",
            "Press a fingertip beyond the bandage; color should return within two seconds.",
            &["wristwatch"],
            "circulation is fine",
        ),
    ]
}

pub fn trainer() -> StepTrainer {
    // Unrecognized commands are dropped silently in this game.
    StepTrainer::new(steps(), false)
}

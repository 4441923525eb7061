//! Carpentry trainer content
//!
//! The carpentry variant surfaces an advisory string on unrecognized
//! commands instead of dropping them silently.

use crate::steps::{StepDefinition, StepTrainer};

pub fn steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new(
            "measure the plank",
            "Measure 60 centimeters from the end of the plank and mark a straight cut line.",
            &["tape measure", "carpenter's pencil", "square"],
            "done measuring",
        ),
        StepDefinition::new(
            "cut the plank",
            "Clamp the plank down and saw along the marked line with long, even strokes.",
            &["hand saw", "two clamps", "workbench"],
            "done cutting",
        ),
        StepDefinition::new(
            "sand the edges",
            "Sand the cut edge with medium grit first, then fine grit, until smooth.",
            &["sanding block", "120 grit paper", "240 grit paper"],
            "done sanding",
        ),
        StepDefinition::new(
            "drill the pilot holes",
            "Drill two pilot holes 2 centimeters from each end of the plank.",
            &["drill", "3 millimeter bit", "safety glasses"],
            "done drilling",
        ),
        StepDefinition::new(
            "screw the pieces together",
            "Drive a screw through each pilot hole until the heads sit flush.",
            &["screwdriver", "four wood screws"],
            "done screwing",
        ),
    ]
}

pub fn trainer() -> StepTrainer {
    StepTrainer::new(steps(), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_five_ordered_steps() {
        let steps = steps();
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0].name, "measure the plank");
        assert!(steps.iter().all(|s| !s.required_items.is_empty()));
    }

    #[test]
    fn trainer_uses_advisory_variant() {
        let mut trainer = trainer();
        trainer.begin();
        trainer.on_transcript("paint the fence");
        assert!(trainer.advisory().is_some());
    }
}

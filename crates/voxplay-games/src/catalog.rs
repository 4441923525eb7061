//! Static game catalog consumed by the shell/router

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameCategory {
    Quiz,
    Skills,
    Coding,
    Creative,
    Music,
}

/// One catalog entry. `image` and `icon` are asset references resolved by
/// whatever front-end mounts the game.
#[derive(Debug, Clone, Serialize)]
pub struct GameDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub image: &'static str,
    pub icon: &'static str,
    pub instructions: &'static str,
    pub category: GameCategory,
}

/// Ordered catalog; display order is this order.
pub static CATALOG: &[GameDescriptor] = &[
    GameDescriptor {
        id: "quiz",
        title: "Voice Quiz",
        description: "Answer multiple-choice questions out loud.",
        image: "assets/quiz.png",
        icon: "icons/quiz.svg",
        instructions: "Say one of the four options. Saying the exact answer scores a point.",
        category: GameCategory::Quiz,
    },
    GameDescriptor {
        id: "coding",
        title: "Coding Tutor",
        description: "Build and run a tiny program with your voice.",
        image: "assets/coding.png",
        icon: "icons/coding.svg",
        instructions: "Try \"load the sum program\", \"set the first number to 4\", then \"run\".",
        category: GameCategory::Coding,
    },
    GameDescriptor {
        id: "carpentry",
        title: "Carpentry Trainer",
        description: "Work through a small woodworking project step by step.",
        image: "assets/carpentry.png",
        icon: "icons/carpentry.svg",
        instructions: "Say \"next step\" when you finish, or ask \"what tools\" and \"explain\".",
        category: GameCategory::Skills,
    },
    GameDescriptor {
        id: "first-aid",
        title: "First Aid Trainer",
        description: "Practice treating a minor wound in the right order.",
        image: "assets/first-aid.png",
        icon: "icons/first-aid.svg",
        instructions: "Say \"next step\" when you finish, or ask \"what tools\" and \"explain\".",
        category: GameCategory::Skills,
    },
    GameDescriptor {
        id: "story",
        title: "Story Builder",
        description: "Tell a story one sentence at a time.",
        image: "assets/story.png",
        icon: "icons/story.svg",
        instructions: "Speak a sentence to add it. Say \"read my story\" or \"the end\".",
        category: GameCategory::Creative,
    },
    GameDescriptor {
        id: "rhythm",
        title: "Rhythm Repeater",
        description: "Sing the note sequence back to the band.",
        image: "assets/rhythm.png",
        icon: "icons/rhythm.svg",
        instructions: "Repeat the notes you see, like \"do re mi\". 70% accuracy passes.",
        category: GameCategory::Music,
    },
];

pub fn find(id: &str) -> Option<&'static GameDescriptor> {
    CATALOG.iter().find(|g| g.id == id)
}

pub fn by_category(category: GameCategory) -> Vec<&'static GameDescriptor> {
    CATALOG.iter().filter(|g| g.category == category).collect()
}

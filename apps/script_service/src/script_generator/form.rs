use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;

/// Declares a closed set of form choices that serialize as their display label.
macro_rules! option_set {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

option_set!(
    /// Fixed guidance layered on top of the user's choices.
    ScriptTemplate {
        Custom => "Custom",
        Tutorial => "Tutorial",
        ProductReview => "Product Review",
        Storytelling => "Storytelling",
    }
);

option_set!(ToneStyle {
    Casual => "Casual",
    Professional => "Professional",
    Humorous => "Humorous",
    Inspirational => "Inspirational",
});

option_set!(TargetAudience {
    Beginners => "Beginners",
    TechEnthusiasts => "Tech Enthusiasts",
    Entrepreneurs => "Entrepreneurs",
});

option_set!(VideoLength {
    Short => "Short (1-3 min)",
    Medium => "Medium (3-5 min)",
    Long => "Long (5-10 min)",
});

option_set!(Language {
    English => "English",
    Spanish => "Spanish",
    French => "French",
});

option_set!(UseCase {
    Tutorials => "Tutorials",
    ProductReviews => "Product Reviews",
    ExplainerVideos => "Explainer Videos",
    Vlogs => "Vlogs",
    MotivationalSpeeches => "Motivational Speeches",
    ComedySkits => "Comedy Skits",
    EducationalContent => "Educational Content",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSections {
    pub introduction: bool,
    pub main_content: bool,
    pub call_to_action: bool,
}

impl Default for ScriptSections {
    fn default() -> Self {
        Self {
            introduction: true,
            main_content: true,
            call_to_action: true,
        }
    }
}

impl ScriptSections {
    pub fn selected(&self) -> Vec<&'static str> {
        [
            (self.introduction, "Introduction"),
            (self.main_content, "Main Content"),
            (self.call_to_action, "Call to Action"),
        ]
        .into_iter()
        .filter_map(|(on, label)| on.then_some(label))
        .collect()
    }
}

/// Everything the user picked on the "write script" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptForm {
    pub template: ScriptTemplate,
    pub topic: String,
    pub tone: ToneStyle,
    pub audience: Vec<TargetAudience>,
    pub length: VideoLength,
    pub language: Language,
    pub keywords: String,
    pub use_case: UseCase,
    pub sections: ScriptSections,
}

impl Default for ScriptForm {
    fn default() -> Self {
        Self {
            template: ScriptTemplate::Custom,
            topic: String::new(),
            tone: ToneStyle::Casual,
            audience: Vec::new(),
            length: VideoLength::Short,
            language: Language::English,
            keywords: String::new(),
            use_case: UseCase::Tutorials,
            sections: ScriptSections::default(),
        }
    }
}

impl ScriptForm {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.topic.trim().is_empty() {
            return Err(AppError::Validation(
                "Please provide a topic for the video.".to_string(),
            ));
        }
        Ok(())
    }
}

/// The option sets a client needs to render the form.
#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub templates: &'static [ScriptTemplate],
    pub tones: &'static [ToneStyle],
    pub audiences: &'static [TargetAudience],
    pub lengths: &'static [VideoLength],
    pub languages: &'static [Language],
    pub use_cases: &'static [UseCase],
    pub defaults: ScriptForm,
}

impl FormOptions {
    pub fn all() -> Self {
        Self {
            templates: ScriptTemplate::ALL,
            tones: ToneStyle::ALL,
            audiences: TargetAudience::ALL,
            lengths: VideoLength::ALL,
            languages: Language::ALL,
            use_cases: UseCase::ALL,
            defaults: ScriptForm::default(),
        }
    }
}

use super::form::{ScriptForm, ScriptTemplate};

pub struct ScriptPrompt;

impl ScriptPrompt {
    fn template_guidance(template: ScriptTemplate) -> Option<&'static str> {
        match template {
            ScriptTemplate::Custom => None,
            ScriptTemplate::Tutorial => Some(
                "Structure: a step-by-step tutorial. State what the viewer will be able to do \
                 by the end, walk through each step in order with clear on-screen actions, \
                 and recap the key steps before closing.",
            ),
            ScriptTemplate::ProductReview => Some(
                "Structure: a product review. Introduce the product and who it is for, cover \
                 design, features and real-world performance, weigh pros against cons, and \
                 finish with a clear verdict and recommendation.",
            ),
            ScriptTemplate::Storytelling => Some(
                "Structure: a story. Open with a hook, introduce a relatable character or \
                 situation, build tension through a challenge, resolve it, and land on the \
                 lesson the audience should take away.",
            ),
        }
    }

    pub fn build(form: &ScriptForm) -> String {
        let audience = form
            .audience
            .iter()
            .map(|a| a.label())
            .collect::<Vec<_>>()
            .join(", ");

        let mut prompt = format!(
            "Write a YouTube script in {} for a {} video about {}.\n\
             Tone: {}\n\
             Target Audience: {}\n\
             Keywords: {}\n\
             Use Case: {}\n",
            form.language,
            form.length,
            form.topic.trim(),
            form.tone,
            audience,
            form.keywords.trim(),
            form.use_case,
        );

        if let Some(guidance) = Self::template_guidance(form.template) {
            prompt.push_str(guidance);
            prompt.push('\n');
        }

        let sections = form.sections.selected();
        if !sections.is_empty() {
            prompt.push_str("\nInclude the following sections:\n");
            for section in sections {
                prompt.push_str(section);
                prompt.push('\n');
            }
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script_generator::form::{
        Language, ScriptSections, TargetAudience, ToneStyle, UseCase, VideoLength,
    };

    fn form() -> ScriptForm {
        ScriptForm {
            topic: "  home espresso on a budget ".to_string(),
            tone: ToneStyle::Humorous,
            audience: vec![TargetAudience::Beginners, TargetAudience::Entrepreneurs],
            length: VideoLength::Medium,
            language: Language::Spanish,
            keywords: "espresso, grinder".to_string(),
            use_case: UseCase::ExplainerVideos,
            ..Default::default()
        }
    }

    #[test]
    fn includes_every_choice() {
        let prompt = ScriptPrompt::build(&form());
        assert!(prompt.starts_with(
            "Write a YouTube script in Spanish for a Medium (3-5 min) video about home espresso on a budget.\n"
        ));
        assert!(prompt.contains("Tone: Humorous\n"));
        assert!(prompt.contains("Target Audience: Beginners, Entrepreneurs\n"));
        assert!(prompt.contains("Keywords: espresso, grinder\n"));
        assert!(prompt.contains("Use Case: Explainer Videos\n"));
        assert!(prompt.ends_with(
            "Include the following sections:\nIntroduction\nMain Content\nCall to Action\n"
        ));
    }

    #[test]
    fn custom_template_adds_no_guidance() {
        let prompt = ScriptPrompt::build(&form());
        assert!(!prompt.contains("Structure:"));
    }

    #[test]
    fn template_guidance_is_appended() {
        let prompt = ScriptPrompt::build(&ScriptForm {
            template: ScriptTemplate::ProductReview,
            ..form()
        });
        assert!(prompt.contains("Structure: a product review."));
    }

    #[test]
    fn no_sections_drops_the_section_block() {
        let prompt = ScriptPrompt::build(&ScriptForm {
            sections: ScriptSections {
                introduction: false,
                main_content: false,
                call_to_action: false,
            },
            ..form()
        });
        assert!(!prompt.contains("Include the following sections"));
    }
}

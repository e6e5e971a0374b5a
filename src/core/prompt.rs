//! Prompt templates, one per category.

use crate::domain::model::{Birthdate, Category, Prompt};

pub const SYSTEM_PROMPT: &str = "You are a professional astrologer with deep knowledge of zodiac signs, \
birth charts, and planetary movements. Provide accurate predictions in Burmese language.";

pub const TARGET_LANGUAGE: &str = "Burmese";

/// Sections shared by the weekly, monthly and yearly forecasts.
pub const FORECAST_SECTIONS: [(&str, &str); 4] = [
    ("Economic", "ငွေကြေးအခြေအနေ"),
    ("Love", "အချစ်ရေး"),
    ("Education", "ပညာရေး"),
    ("Health", "ကျန်းမာရေး"),
];

/// Labeled lists requested by the recommendations prompt, with item counts.
pub const RECOMMENDATION_LISTS: [(&str, &str, usize); 8] = [
    ("Things to do", "ပြုလုပ်သင့်သည်များ", 5),
    ("Things not to do", "မပြုလုပ်သင့်သည်များ", 5),
    ("Lucky colors", "ကံကောင်းသည့်အရောင်များ", 3),
    ("Unlucky colors", "ကံမကောင်းသည့်အရောင်များ", 3),
    ("Lucky numbers", "ကံကောင်းသည့်နံပါတ်များ", 3),
    ("Unlucky numbers", "ကံမကောင်းသည့်နံပါတ်များ", 3),
    ("Lucky places", "ကံကောင်းသည့်နေရာများ", 3),
    ("Unlucky places", "ကံမကောင်းသည့်နေရာများ", 3),
];

pub fn build_prompt(birthdate: &Birthdate, category: Category) -> Prompt {
    // 預測時間越長，每段要求的句數越多
    let text = match category {
        Category::Weekly => forecast_prompt(birthdate, "week", "3-4"),
        Category::Monthly => forecast_prompt(birthdate, "month", "4-5"),
        Category::Yearly => forecast_prompt(birthdate, "year", "5-6"),
        Category::Personality => personality_prompt(birthdate),
        Category::Recommendations => recommendations_prompt(birthdate),
    };

    Prompt { category, text }
}

fn forecast_prompt(birthdate: &Birthdate, period: &str, sentences: &str) -> String {
    let mut lines = vec![
        format!(
            "Based on the birthdate {}, predict the future for the current {} in {} language.",
            birthdate, period, TARGET_LANGUAGE
        ),
        "Organize the prediction in these four categories:".to_string(),
    ];
    for (index, (label, local)) in FORECAST_SECTIONS.iter().enumerate() {
        lines.push(format!("{}. {} ({})", index + 1, label, local));
    }
    lines.push(String::new());
    lines.push(format!(
        "Make each prediction {} sentences long and specific to this {}.",
        sentences, period
    ));
    lines.join("\n")
}

fn personality_prompt(birthdate: &Birthdate) -> String {
    format!(
        "Based on the birthdate {}, describe the personality traits of this person in {} language.\n\
         Include both positive and negative traits, about 8-10 sentences total.",
        birthdate, TARGET_LANGUAGE
    )
}

fn recommendations_prompt(birthdate: &Birthdate) -> String {
    let mut lines = vec![format!(
        "Based on the birthdate {}, provide the following in {} language:",
        birthdate, TARGET_LANGUAGE
    )];
    for (index, (label, local, count)) in RECOMMENDATION_LISTS.iter().enumerate() {
        lines.push(format!("{}. {} ({}) - {} items", index + 1, label, local, count));
    }
    lines.push(String::new());
    lines.push("Format the output clearly with headings for each section.".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn birthdate() -> Birthdate {
        Birthdate::parse("15-08-1995").unwrap()
    }

    #[test]
    fn test_every_prompt_embeds_birthdate() {
        for category in Category::ALL {
            let prompt = build_prompt(&birthdate(), category);
            assert_eq!(prompt.category, category);
            assert!(prompt.text.contains("15-08-1995"), "{} prompt", category);
            assert!(prompt.text.contains(TARGET_LANGUAGE));
        }
    }

    #[test]
    fn test_weekly_prompt_sections() {
        let prompt = build_prompt(&birthdate(), Category::Weekly);
        for (label, local) in FORECAST_SECTIONS {
            assert!(prompt.text.contains(label));
            assert!(prompt.text.contains(local));
        }
        assert!(prompt.text.contains("current week"));
        assert!(prompt.text.contains("3-4 sentences"));
    }

    #[test]
    fn test_sentence_length_grows_with_horizon() {
        let monthly = build_prompt(&birthdate(), Category::Monthly);
        assert!(monthly.text.contains("current month"));
        assert!(monthly.text.contains("4-5 sentences"));

        let yearly = build_prompt(&birthdate(), Category::Yearly);
        assert!(yearly.text.contains("current year"));
        assert!(yearly.text.contains("5-6 sentences"));
        for (label, _) in FORECAST_SECTIONS {
            assert!(yearly.text.contains(label));
        }
    }

    #[test]
    fn test_personality_prompt() {
        let prompt = build_prompt(&birthdate(), Category::Personality);
        assert!(prompt.text.contains("positive and negative traits"));
        assert!(prompt.text.contains("8-10 sentences"));
        assert!(!prompt.text.contains("Economic"));
    }

    #[test]
    fn test_recommendations_prompt_item_counts() {
        let prompt = build_prompt(&birthdate(), Category::Recommendations);
        let expected = [
            "Things to do (ပြုလုပ်သင့်သည်များ) - 5 items",
            "Things not to do (မပြုလုပ်သင့်သည်များ) - 5 items",
            "Lucky colors (ကံကောင်းသည့်အရောင်များ) - 3 items",
            "Unlucky colors (ကံမကောင်းသည့်အရောင်များ) - 3 items",
            "Lucky numbers (ကံကောင်းသည့်နံပါတ်များ) - 3 items",
            "Unlucky numbers (ကံမကောင်းသည့်နံပါတ်များ) - 3 items",
            "Lucky places (ကံကောင်းသည့်နေရာများ) - 3 items",
            "Unlucky places (ကံမကောင်းသည့်နေရာများ) - 3 items",
        ];
        for line in expected {
            assert!(prompt.text.contains(line), "missing: {}", line);
        }
        assert!(prompt.text.contains("headings for each section"));
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        for category in Category::ALL {
            let first = build_prompt(&birthdate(), category);
            let second = build_prompt(&birthdate(), category);
            assert_eq!(first.text.as_bytes(), second.text.as_bytes());
        }
    }
}

use crate::utils::error::{ForecastError, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const BIRTHDATE_FORMAT: &str = "%d-%m-%Y";

/// 使用者的生日，固定 `DD-MM-YYYY` 格式（補零）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Birthdate(NaiveDate);

impl Birthdate {
    pub fn parse(raw: &str) -> Result<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = PATTERN
            .get_or_init(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("static birthdate regex"));

        let invalid = || ForecastError::InvalidBirthdate {
            input: raw.to_string(),
        };

        // chrono 的 %d 也接受未補零的數字，先用正規表達式檢查格式
        if !pattern.is_match(raw) {
            return Err(invalid());
        }

        NaiveDate::parse_from_str(raw, BIRTHDATE_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for Birthdate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for Birthdate {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Birthdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(BIRTHDATE_FORMAT))
    }
}

impl Serialize for Birthdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The five concrete prediction categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Weekly,
    Monthly,
    Yearly,
    Personality,
    Recommendations,
}

impl Category {
    /// Canonical order used by the aggregate document.
    pub const ALL: [Category; 5] = [
        Category::Weekly,
        Category::Monthly,
        Category::Yearly,
        Category::Personality,
        Category::Recommendations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Weekly => "weekly",
            Category::Monthly => "monthly",
            Category::Yearly => "yearly",
            Category::Personality => "personality",
            Category::Recommendations => "recommendations",
        }
    }

    /// Localized heading shown above the generated text.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Weekly => "တစ်ပတ်အတွက် ကံကြမ္မာခန့်မှန်းချက်",
            Category::Monthly => "တစ်လအတွက် ကံကြမ္မာခန့်မှန်းချက်",
            Category::Yearly => "တစ်နှစ်အတွက် ကံကြမ္မာခန့်မှန်းချက်",
            Category::Personality => "ကိုယ်ရေးကိုယ်တာ စရိုက်လက္ခဏာများ",
            Category::Recommendations => "ပြုလုပ်သင့်သည်များနှင့် ရှောင်ကြဉ်သင့်သည်များ",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const ALL_PREDICTIONS_TITLE: &str = "အားလုံးခန့်မှန်းချက်များ";

/// What the caller asked for: one category, or the composite "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySelector {
    One(Category),
    All,
}

impl CategorySelector {
    pub fn categories(&self) -> Vec<Category> {
        match self {
            CategorySelector::One(category) => vec![*category],
            CategorySelector::All => Category::ALL.to_vec(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CategorySelector::One(category) => category.title(),
            CategorySelector::All => ALL_PREDICTIONS_TITLE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategorySelector::One(category) => category.as_str(),
            CategorySelector::All => "all",
        }
    }
}

impl FromStr for CategorySelector {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        let selector = match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => CategorySelector::One(Category::Weekly),
            "monthly" => CategorySelector::One(Category::Monthly),
            "yearly" => CategorySelector::One(Category::Yearly),
            "personality" => CategorySelector::One(Category::Personality),
            // 舊表單使用 dos_donts 這個值
            "recommendations" | "dos_donts" => CategorySelector::One(Category::Recommendations),
            "all" => CategorySelector::All,
            _ => {
                return Err(ForecastError::InvalidCategory {
                    input: s.to_string(),
                })
            }
        };
        Ok(selector)
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CategorySelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Prompt text for a single provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub category: Category,
    pub text: String,
}

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum PredictionOutcome {
    Generated(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub category: Category,
    pub title: &'static str,
    pub outcome: PredictionOutcome,
}

impl PredictionResult {
    pub fn generated(category: Category, text: String) -> Self {
        Self {
            category,
            title: category.title(),
            outcome: PredictionOutcome::Generated(text),
        }
    }

    pub fn failed(category: Category, reason: String) -> Self {
        Self {
            category,
            title: category.title(),
            outcome: PredictionOutcome::Failed(reason),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, PredictionOutcome::Failed(_))
    }

    /// Text handed to the renderer; failures read as `Error: <reason>`.
    pub fn display_text(&self) -> String {
        match &self.outcome {
            PredictionOutcome::Generated(text) => text.clone(),
            PredictionOutcome::Failed(reason) => format!("Error: {}", reason),
        }
    }
}

pub const SECTION_DIVIDER: &str = "---";

#[derive(Debug, Clone, Serialize)]
pub struct AggregateDocument {
    pub birthdate: Birthdate,
    pub selector: CategorySelector,
    pub title: &'static str,
    pub results: Vec<PredictionResult>,
}

impl AggregateDocument {
    pub fn new(
        birthdate: Birthdate,
        selector: CategorySelector,
        results: Vec<PredictionResult>,
    ) -> Self {
        Self {
            birthdate,
            selector,
            title: selector.title(),
            results,
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.results.iter().map(|r| r.category).collect()
    }

    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    pub fn to_markdown(&self) -> String {
        let mut output = format!("# {}\n\n", self.title);

        match self.selector {
            CategorySelector::One(_) => {
                for result in &self.results {
                    output.push_str(result.display_text().trim_end());
                    output.push('\n');
                }
            }
            CategorySelector::All => {
                let sections: Vec<String> = self
                    .results
                    .iter()
                    .map(|r| format!("### {}:\n\n{}", r.title, r.display_text().trim_end()))
                    .collect();
                output.push_str(&sections.join(&format!("\n\n{}\n\n", SECTION_DIVIDER)));
                output.push('\n');
            }
        }

        output
    }
}

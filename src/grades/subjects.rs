pub const MATHEMATICS: &str = "Mathematics";
pub const ENGLISH: &str = "English";
pub const KISWAHILI: &str = "Kiswahili";
pub const BIOLOGY: &str = "Biology";
pub const CHEMISTRY: &str = "Chemistry";
pub const PHYSICS: &str = "Physics";
pub const GENERAL_SCIENCE: &str = "General Science";
pub const GEOGRAPHY: &str = "Geography";
pub const HISTORY: &str = "History";
pub const CRE: &str = "CRE";
pub const IRE: &str = "IRE";
pub const HRE: &str = "HRE";
pub const AGRICULTURE: &str = "Agriculture";
pub const BUSINESS_STUDIES: &str = "Business Studies";
pub const COMPUTER_STUDIES: &str = "Computer Studies";
pub const ART_AND_DESIGN: &str = "Art & Design";
pub const HOME_SCIENCE: &str = "Home Science";
pub const MUSIC: &str = "Music";
pub const FRENCH: &str = "French";
pub const GERMAN: &str = "German";
pub const ARABIC: &str = "Arabic";

pub const HUMANITIES: [&str; 5] = [HISTORY, GEOGRAPHY, CRE, IRE, HRE];
pub const RELIGIOUS_EDUCATION: [&str; 3] = [CRE, IRE, HRE];
pub const SCIENCES: [&str; 3] = [BIOLOGY, CHEMISTRY, PHYSICS];

/// Maps common spellings and KNEC abbreviations onto one canonical name.
/// Unknown subjects are returned trimmed with their original casing.
pub fn canonical_subject(raw: &str) -> String {
    let trimmed = raw.trim();
    let normalized = trimmed
        .to_ascii_lowercase()
        .replace(['.', '_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let canonical = match normalized.as_str() {
        "mathematics" | "maths" | "math" | "mat" | "mathematics a" | "mathematics alt a" => {
            MATHEMATICS
        }
        "english" | "eng" => ENGLISH,
        "kiswahili" | "kis" | "swahili" => KISWAHILI,
        "biology" | "bio" => BIOLOGY,
        "chemistry" | "chem" | "che" => CHEMISTRY,
        "physics" | "phy" | "phys" => PHYSICS,
        "general science" | "gsc" => GENERAL_SCIENCE,
        "geography" | "geo" => GEOGRAPHY,
        "history" | "history and government" | "history & government" | "hag" | "hist" => {
            HISTORY
        }
        "cre" | "c r e" | "christian religious education" => CRE,
        "ire" | "i r e" | "islamic religious education" => IRE,
        "hre" | "h r e" | "hindu religious education" => HRE,
        "agriculture" | "agric" | "agr" => AGRICULTURE,
        "business studies" | "business" | "bst" | "bs" => BUSINESS_STUDIES,
        "computer studies" | "computer" | "computers" | "cmp" | "comp" => COMPUTER_STUDIES,
        "art & design" | "art and design" | "art" | "ard" => ART_AND_DESIGN,
        "home science" | "hsc" => HOME_SCIENCE,
        "music" | "muc" => MUSIC,
        "french" | "fre" => FRENCH,
        "german" | "ger" => GERMAN,
        "arabic" | "arb" => ARABIC,
        _ => return trimmed.to_string(),
    };
    canonical.to_string()
}

pub fn split_alternatives(label: &str) -> Vec<String> {
    label
        .split(['/', '|', ','])
        .flat_map(|part| part.split(" or "))
        .map(canonical_subject)
        .filter(|s| !s.is_empty())
        .collect()
}

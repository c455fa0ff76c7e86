use crate::clusters::ClusterCategory;
use crate::error::{EngineError, EngineResult};
use crate::grades::subjects::{
    AGRICULTURE, ARABIC, ART_AND_DESIGN, BIOLOGY, BUSINESS_STUDIES, CHEMISTRY, COMPUTER_STUDIES,
    CRE, ENGLISH, FRENCH, GEOGRAPHY, GERMAN, HISTORY, HOME_SCIENCE, HRE, IRE, KISWAHILI,
    MATHEMATICS, MUSIC, PHYSICS,
};

const LANGUAGES: &[&str] = &[ENGLISH, KISWAHILI];
const HUMANITIES: &[&str] = &[HISTORY, GEOGRAPHY, CRE, IRE, HRE];

#[derive(Debug, Clone)]
pub struct ClusterRegistry {
    categories: Vec<ClusterCategory>,
}

impl ClusterRegistry {
    pub fn with_defaults() -> Self {
        Self {
            categories: default_categories(),
        }
    }

    pub fn from_categories(mut categories: Vec<ClusterCategory>) -> Self {
        categories.sort_by(|a, b| a.id.cmp(&b.id));
        Self { categories }
    }

    pub fn list_categories(&self) -> &[ClusterCategory] {
        &self.categories
    }

    pub fn get_category(&self, id: &str) -> EngineResult<&ClusterCategory> {
        let wanted = normalize_cluster_id(id).unwrap_or_else(|| id.trim().to_string());
        self.categories
            .iter()
            .find(|c| c.id == wanted)
            .ok_or_else(|| EngineError::ClusterNotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for ClusterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Accepts `CL05`, `cl5`, `5` or `05` and returns `CL05`.
pub fn normalize_cluster_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("CL")
        .or_else(|| trimmed.strip_prefix("cl"))
        .or_else(|| trimmed.strip_prefix("Cl"))
        .unwrap_or(trimmed);
    let number: u32 = digits.parse().ok()?;
    if number == 0 {
        return None;
    }
    Some(format!("CL{number:02}"))
}

fn default_categories() -> Vec<ClusterCategory> {
    vec![
        ClusterCategory::new(
            "CL01",
            "Law",
            "Law and related programmes",
            [
                &[ENGLISH],
                &[KISWAHILI, MATHEMATICS],
                &[HISTORY, CRE, IRE, HRE],
                &[GEOGRAPHY, BUSINESS_STUDIES, BIOLOGY, CHEMISTRY, PHYSICS],
            ],
        ),
        ClusterCategory::new(
            "CL02",
            "Business, Hospitality & Related",
            "Commerce, hospitality, tourism and related programmes",
            [
                &[MATHEMATICS],
                LANGUAGES,
                &[BUSINESS_STUDIES, COMPUTER_STUDIES, AGRICULTURE, HOME_SCIENCE],
                &[BIOLOGY, CHEMISTRY, PHYSICS, GEOGRAPHY, HISTORY, CRE, IRE, HRE],
            ],
        ),
        ClusterCategory::new(
            "CL03",
            "Social Sciences, Media Studies, Fine Arts, Film, Animation, Graphics & Related",
            "Arts, communication, media and social science programmes",
            [
                LANGUAGES,
                &[MATHEMATICS, BIOLOGY, CHEMISTRY, PHYSICS],
                HUMANITIES,
                &[
                    ART_AND_DESIGN,
                    MUSIC,
                    FRENCH,
                    GERMAN,
                    ARABIC,
                    BUSINESS_STUDIES,
                    COMPUTER_STUDIES,
                    HOME_SCIENCE,
                    AGRICULTURE,
                ],
            ],
        ),
        ClusterCategory::new(
            "CL04",
            "Geosciences & Related",
            "Geology, meteorology, mining and earth science programmes",
            [
                &[MATHEMATICS],
                &[PHYSICS],
                &[CHEMISTRY, BIOLOGY],
                &[GEOGRAPHY, AGRICULTURE, COMPUTER_STUDIES, ENGLISH, KISWAHILI],
            ],
        ),
        ClusterCategory::new(
            "CL05",
            "Engineering, Engineering Technology & Related",
            "Civil, mechanical, electrical and related engineering programmes",
            [&[MATHEMATICS], &[PHYSICS], &[CHEMISTRY], LANGUAGES],
        ),
        ClusterCategory::new(
            "CL06",
            "Architecture, Building Construction & Related",
            "Architecture, quantity surveying, construction and planning programmes",
            [
                &[MATHEMATICS],
                &[PHYSICS],
                &[CHEMISTRY, GEOGRAPHY, ART_AND_DESIGN, COMPUTER_STUDIES],
                LANGUAGES,
            ],
        ),
        ClusterCategory::new(
            "CL07",
            "Computing, IT & Related",
            "Computer science, information technology and software programmes",
            [
                &[MATHEMATICS],
                &[PHYSICS, COMPUTER_STUDIES],
                &[CHEMISTRY, BIOLOGY, BUSINESS_STUDIES, GEOGRAPHY],
                LANGUAGES,
            ],
        ),
        ClusterCategory::new(
            "CL08",
            "Agribusiness & Related",
            "Agricultural economics, agribusiness and cooperative management programmes",
            [
                &[MATHEMATICS],
                &[BIOLOGY, AGRICULTURE],
                &[CHEMISTRY, PHYSICS, GEOGRAPHY, BUSINESS_STUDIES],
                LANGUAGES,
            ],
        ),
        ClusterCategory::new(
            "CL09",
            "General Science & Related",
            "Pure and applied science programmes",
            [&[MATHEMATICS], &[BIOLOGY], &[CHEMISTRY], &[PHYSICS, GEOGRAPHY]],
        ),
        ClusterCategory::new(
            "CL10",
            "Actuarial Science, Accountancy, Mathematics, Economics, Statistics & Related",
            "Quantitative finance, economics and statistics programmes",
            [
                &[MATHEMATICS],
                LANGUAGES,
                &[BUSINESS_STUDIES, COMPUTER_STUDIES, GEOGRAPHY],
                &[PHYSICS, CHEMISTRY, BIOLOGY, HISTORY, CRE, IRE, HRE],
            ],
        ),
        ClusterCategory::new(
            "CL11",
            "Interior Design, Fashion Design, Textiles & Related",
            "Design, textile science and fashion programmes",
            [
                &[CHEMISTRY, PHYSICS],
                &[MATHEMATICS],
                &[ART_AND_DESIGN, HOME_SCIENCE, COMPUTER_STUDIES],
                LANGUAGES,
            ],
        ),
        ClusterCategory::new(
            "CL12",
            "Sport Science & Related",
            "Sports science, physical education and recreation programmes",
            [
                &[BIOLOGY],
                &[MATHEMATICS],
                LANGUAGES,
                &[PHYSICS, CHEMISTRY, GEOGRAPHY, HISTORY, CRE, IRE, HRE],
            ],
        ),
        ClusterCategory::new(
            "CL13",
            "Medicine, Health, Veterinary Medicine & Related",
            "Medicine, nursing, pharmacy, dentistry and veterinary programmes",
            [&[BIOLOGY], &[CHEMISTRY], &[MATHEMATICS, PHYSICS], LANGUAGES],
        ),
        ClusterCategory::new(
            "CL14",
            "History, Archeology & Related",
            "History, archaeology and heritage programmes",
            [
                &[HISTORY],
                LANGUAGES,
                &[MATHEMATICS, BIOLOGY, CHEMISTRY, PHYSICS],
                &[GEOGRAPHY, CRE, IRE, HRE, BUSINESS_STUDIES],
            ],
        ),
        ClusterCategory::new(
            "CL15",
            "Agriculture, Animal Health, Food Science, Nutrition & Dietetics, Environmental Sciences & Related",
            "Agriculture, food, nutrition and environmental programmes",
            [
                &[BIOLOGY],
                &[CHEMISTRY],
                &[MATHEMATICS, PHYSICS, GEOGRAPHY],
                &[AGRICULTURE, HOME_SCIENCE, ENGLISH, KISWAHILI],
            ],
        ),
        ClusterCategory::new(
            "CL16",
            "Geography & Related",
            "Geography and spatial science programmes",
            [
                &[GEOGRAPHY],
                &[MATHEMATICS],
                &[BIOLOGY, CHEMISTRY, PHYSICS],
                LANGUAGES,
            ],
        ),
        ClusterCategory::new(
            "CL17",
            "French & German",
            "Foreign language programmes",
            [
                &[FRENCH, GERMAN],
                &[ENGLISH],
                &[MATHEMATICS, KISWAHILI],
                &[HISTORY, GEOGRAPHY, CRE, IRE, HRE, BUSINESS_STUDIES],
            ],
        ),
        ClusterCategory::new(
            "CL18",
            "Music & Related",
            "Music and performing arts programmes",
            [
                &[MUSIC],
                LANGUAGES,
                &[MATHEMATICS, BIOLOGY, CHEMISTRY, PHYSICS],
                HUMANITIES,
            ],
        ),
        ClusterCategory::new(
            "CL19",
            "Education & Related",
            "Teacher education programmes",
            [
                &[ENGLISH],
                &[MATHEMATICS],
                &[BIOLOGY, CHEMISTRY, PHYSICS],
                &[HISTORY, GEOGRAPHY, CRE, IRE, HRE, KISWAHILI],
            ],
        ),
        ClusterCategory::new(
            "CL20",
            "Religious Studies, Theology, Islamic Studies & Related",
            "Theology, religious and Islamic studies programmes",
            [
                &[CRE, IRE, HRE],
                &[ENGLISH],
                &[KISWAHILI, MATHEMATICS],
                &[HISTORY, GEOGRAPHY, BUSINESS_STUDIES],
            ],
        ),
    ]
}

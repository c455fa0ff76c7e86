use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::eligibility::MatchFilters;
use crate::error::{EngineError, EngineResult};
use crate::grades::{canonical_subject, Grade};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectGrade {
    pub subject: String,
    pub grade: Grade,
}

impl SubjectGrade {
    pub fn points(&self) -> u32 {
        self.grade.points()
    }
}

/// Immutable snapshot of one student's results. Subject names are canonical
/// and unique; entry order is preserved and used as the tie-break wherever
/// subjects are ranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentProfile {
    mean_grade: Grade,
    subjects: Vec<SubjectGrade>,
}

impl StudentProfile {
    pub fn new<S, I>(mean_grade: Grade, subjects: I) -> EngineResult<Self>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, Grade)>,
    {
        let mut out: Vec<SubjectGrade> = Vec::new();
        for (name, grade) in subjects {
            let subject = canonical_subject(name.as_ref());
            if subject.is_empty() {
                continue;
            }
            if out.iter().any(|s| s.subject == subject) {
                return Err(EngineError::DuplicateSubject(subject));
            }
            out.push(SubjectGrade { subject, grade });
        }
        Ok(Self {
            mean_grade,
            subjects: out,
        })
    }

    pub fn parse<'a, I>(mean_grade: &str, subjects: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mean_grade = Grade::from_str(mean_grade)?;
        let mut parsed = Vec::new();
        for (name, raw_grade) in subjects {
            if raw_grade.trim().is_empty() {
                continue;
            }
            parsed.push((name, Grade::from_str(raw_grade)?));
        }
        Self::new(mean_grade, parsed)
    }

    pub fn mean_grade(&self) -> Grade {
        self.mean_grade
    }

    pub fn subjects(&self) -> &[SubjectGrade] {
        &self.subjects
    }

    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    pub fn has_subjects(&self) -> bool {
        !self.subjects.is_empty()
    }

    pub fn grade_of(&self, subject: &str) -> Option<Grade> {
        let canonical = canonical_subject(subject);
        self.subjects
            .iter()
            .find(|s| s.subject == canonical)
            .map(|s| s.grade)
    }

    /// The `n` highest-scoring subjects. Equal grades keep entry order.
    pub fn best_subjects(&self, n: usize) -> Vec<&SubjectGrade> {
        let mut ranked: Vec<&SubjectGrade> = self.subjects.iter().collect();
        ranked.sort_by(|a, b| b.points().cmp(&a.points()));
        ranked.truncate(n);
        ranked
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileInput {
    pub mean_grade: String,
    #[serde(default)]
    pub subjects: IndexMap<String, String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub counties: Vec<String>,
    #[serde(default)]
    pub institution_types: Vec<String>,
}

impl ProfileInput {
    pub fn to_profile(&self) -> EngineResult<StudentProfile> {
        StudentProfile::parse(
            &self.mean_grade,
            self.subjects
                .iter()
                .map(|(subject, grade)| (subject.as_str(), grade.as_str())),
        )
    }

    pub fn filters(&self) -> MatchFilters {
        MatchFilters::new(self.counties.clone(), self.institution_types.clone())
    }
}

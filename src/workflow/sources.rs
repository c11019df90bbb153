//! Source citations shown in the sources drawer.

use serde::Serialize;

/// Document titles cited by the research step of the demo.
pub(crate) const ATTENDANCE_STEP_SOURCES: [&str; 3] =
    ["Academic Policy Document 2024", "Student Handbook", "Historical Weather Data"];

/// A cited document with a relevance score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCitation {
    pub title: &'static str,
    pub url: &'static str,
    /// 0-100
    pub relevance: u8,
    pub kind: &'static str,
}

/// Citations backing the attendance report.
pub fn mock_sources() -> Vec<SourceCitation> {
    vec![
        SourceCitation {
            title: "Academic Policy Document 2024",
            url: "policy.edu/academic-2024.pdf",
            relevance: 95,
            kind: "PDF",
        },
        SourceCitation {
            title: "Student Attendance Analysis - MIT Study",
            url: "research.mit.edu/attendance-patterns",
            relevance: 87,
            kind: "Research",
        },
        SourceCitation {
            title: "Best Practices in Higher Education",
            url: "education.gov/best-practices",
            relevance: 82,
            kind: "Government",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_sorted_by_relevance() {
        let sources = mock_sources();
        assert_eq!(sources.len(), 3);
        assert!(sources.windows(2).all(|w| w[0].relevance >= w[1].relevance));
    }
}

//! Renderer-neutral dashboard content.
//!
//! Variants describe what a tab shows; the TUI and the CLI decide how.

use serde::Serialize;

use crate::core::NotificationKind;

/// Emphasis for a row or stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Normal,
    Good,
    Warning,
    Critical,
    Muted,
}

impl From<NotificationKind> for Tone {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Info => Self::Normal,
            NotificationKind::Success => Self::Good,
            NotificationKind::Warning => Self::Warning,
            NotificationKind::Error => Self::Critical,
        }
    }
}

/// A headline number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub tone: Tone,
}

impl Stat {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { label: label.into(), value: value.into(), hint: None, tone: Tone::Normal }
    }

    #[must_use]
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }
}

/// One line of a list: label on the left, value on the right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub label: String,
    pub detail: String,
    pub value: String,
    pub tone: Tone,
}

impl Row {
    pub fn new(label: impl Into<String>, detail: impl Into<String>, value: impl Into<String>) -> Self {
        Self { label: label.into(), detail: detail.into(), value: value.into(), tone: Tone::Normal }
    }

    #[must_use]
    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum SectionBody {
    Stats(Vec<Stat>),
    Rows(Vec<Row>),
    Text(Vec<String>),
}

/// A titled block of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub body: SectionBody,
}

impl Section {
    pub fn stats(title: impl Into<String>, stats: Vec<Stat>) -> Self {
        Self { title: title.into(), body: SectionBody::Stats(stats) }
    }

    pub fn rows(title: impl Into<String>, rows: Vec<Row>) -> Self {
        Self { title: title.into(), body: SectionBody::Rows(rows) }
    }

    pub fn text<I, S>(title: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { title: title.into(), body: SectionBody::Text(lines.into_iter().map(Into::into).collect()) }
    }

    /// Number of entries in the body.
    pub fn len(&self) -> usize {
        match &self.body {
            SectionBody::Stats(s) => s.len(),
            SectionBody::Rows(r) => r.len(),
            SectionBody::Text(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find a stat by label.
    pub fn stat(&self, label: &str) -> Option<&Stat> {
        match &self.body {
            SectionBody::Stats(stats) => stats.iter().find(|s| s.label == label),
            _ => None,
        }
    }

    /// Plain-text lines, used by the CLI text output.
    pub fn plain_lines(&self) -> Vec<String> {
        match &self.body {
            SectionBody::Stats(stats) => stats
                .iter()
                .map(|s| match &s.hint {
                    Some(hint) => format!("{}: {} ({hint})", s.label, s.value),
                    None => format!("{}: {}", s.label, s.value),
                })
                .collect(),
            SectionBody::Rows(rows) => rows
                .iter()
                .map(|r| {
                    if r.detail.is_empty() {
                        format!("{}  {}", r.label, r.value)
                    } else {
                        format!("{} - {}  {}", r.label, r.detail, r.value)
                    }
                })
                .collect(),
            SectionBody::Text(lines) => lines.clone(),
        }
    }
}

/// Format an amount in rupees with Indian digit grouping (`₹45,00,000`).
pub fn rupees(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{digits}");
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (a, b) = rest.split_at(rest.len() - 2);
        groups.push(b);
        rest = a;
    }
    groups.push(rest);
    groups.reverse();
    format!("₹{},{tail}", groups.join(","))
}

/// Compact amount: `₹4.56Cr`, `₹23L`, `₹45K`.
pub fn rupees_short(amount: u64) -> String {
    const CRORE: u64 = 10_000_000;
    const LAKH: u64 = 100_000;
    #[allow(clippy::cast_precision_loss)]
    let value = amount as f64;
    if amount >= CRORE {
        format!("₹{:.2}Cr", value / CRORE as f64)
    } else if amount >= LAKH {
        format!("₹{:.1}L", value / LAKH as f64)
    } else if amount >= 1000 {
        format!("₹{:.0}K", value / 1000.0)
    } else {
        format!("₹{amount}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rupees_grouping() {
        assert_eq!(rupees(0), "₹0");
        assert_eq!(rupees(999), "₹999");
        assert_eq!(rupees(45000), "₹45,000");
        assert_eq!(rupees(150000), "₹1,50,000");
        assert_eq!(rupees(45_600_000), "₹4,56,00,000");
    }

    #[test]
    fn test_rupees_short() {
        assert_eq!(rupees_short(45_600_000), "₹4.56Cr");
        assert_eq!(rupees_short(2_300_000), "₹23.0L");
        assert_eq!(rupees_short(45000), "₹45K");
        assert_eq!(rupees_short(500), "₹500");
    }

    #[test]
    fn test_section_lookup_and_lines() {
        let section = Section::stats("Overview", vec![Stat::new("CGPA", "8.7").hint("+0.2")]);
        assert_eq!(section.len(), 1);
        assert_eq!(section.stat("CGPA").map(|s| s.value.as_str()), Some("8.7"));
        assert_eq!(section.plain_lines(), vec!["CGPA: 8.7 (+0.2)".to_string()]);

        let rows = Section::rows("Fees", vec![Row::new("Library Fee", "", "₹5,000")]);
        assert!(rows.stat("Library Fee").is_none());
        assert_eq!(rows.plain_lines()[0], "Library Fee  ₹5,000");
    }

    #[test]
    fn test_tone_from_kind() {
        assert_eq!(Tone::from(NotificationKind::Error), Tone::Critical);
        assert_eq!(Tone::from(NotificationKind::Success), Tone::Good);
    }
}

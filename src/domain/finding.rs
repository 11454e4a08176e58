use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// `critical=4, high=3, medium=2, low=1`, used for sort order and score
    /// penalty lookup.
    pub fn order(self) -> u8 {
        match self {
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }

    pub fn penalty(self) -> i32 {
        match self {
            Severity::Critical => 35,
            Severity::High => 20,
            Severity::Medium => 10,
            Severity::Low => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Evidence {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

impl Evidence {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            selector: None,
            value: None,
            metric: None,
        }
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn metric(mut self, metric: impl ToString) -> Self {
        self.metric = Some(metric.to_string());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub id: &'static str,
    pub severity: Severity,
    pub title: &'static str,
    pub description: String,
    pub impact: &'static str,
    pub how_to_fix: &'static str,
    pub evidence: Vec<Evidence>,
    pub affected_urls: Vec<String>,
}

impl Finding {
    pub const MAX_AFFECTED_URLS: usize = 25;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &'static str,
        severity: Severity,
        title: &'static str,
        description: String,
        impact: &'static str,
        how_to_fix: &'static str,
        evidence: Vec<Evidence>,
        affected_urls: Vec<String>,
    ) -> Self {
        let mut affected_urls = affected_urls;
        affected_urls.truncate(Self::MAX_AFFECTED_URLS);
        Self {
            id,
            severity,
            title,
            description,
            impact,
            how_to_fix,
            evidence,
            affected_urls,
        }
    }
}

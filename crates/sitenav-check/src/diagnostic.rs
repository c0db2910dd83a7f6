//! Check findings.

use std::fmt;

use serde::Serialize;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth fixing; fails only strict checks.
    Warning,
    /// Breaks the site.
    Error,
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    DeadSidebarLink,
    DeadNavLink,
    EmptyPrefix,
    BaseLeak,
    DeadContentLink,
    CollectionFailure,
    DuplicateGroup,
    DuplicateLink,
    EmptyGroup,
    OrphanDocument,
    InvalidSocialLink,
}

impl DiagnosticKind {
    /// Severity findings of this kind carry.
    pub fn severity(self) -> Severity {
        match self {
            Self::DeadSidebarLink
            | Self::DeadNavLink
            | Self::EmptyPrefix
            | Self::BaseLeak
            | Self::DeadContentLink
            | Self::CollectionFailure => Severity::Error,
            Self::DuplicateGroup
            | Self::DuplicateLink
            | Self::EmptyGroup
            | Self::OrphanDocument
            | Self::InvalidSocialLink => Severity::Warning,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::DeadSidebarLink => "dead-sidebar-link",
            Self::DeadNavLink => "dead-nav-link",
            Self::EmptyPrefix => "empty-prefix",
            Self::BaseLeak => "base-leak",
            Self::DeadContentLink => "dead-content-link",
            Self::CollectionFailure => "collection-failure",
            Self::DuplicateGroup => "duplicate-group",
            Self::DuplicateLink => "duplicate-link",
            Self::EmptyGroup => "empty-group",
            Self::OrphanDocument => "orphan-document",
            Self::InvalidSocialLink => "invalid-social-link",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity derived from the kind.
    pub severity: Severity,

    /// What the finding is about.
    pub kind: DiagnosticKind,

    /// Where it was found (config origin or `file:line`).
    pub location: String,

    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Create a finding; severity follows from the kind.
    pub fn new(
        kind: DiagnosticKind,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// All findings of a check run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// All findings in the order they were recorded.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Findings of error severity.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Findings of warning severity.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Findings of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    /// Number of errors.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Whether the site passes: no errors, and in strict mode no warnings.
    pub fn is_ok(&self, strict: bool) -> bool {
        self.error_count() == 0 && (!strict || self.warning_count() == 0)
    }
}

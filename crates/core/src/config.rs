/// Flags controlling per-line analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Omit blank lines from the per-line report.
    pub skip_blank_lines: bool,
    /// Treat `[ Estribillo ]`-style lines as song section markers instead of verses.
    pub skip_section_markers: bool,
}

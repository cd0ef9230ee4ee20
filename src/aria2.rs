//! aria2 input file rendering
//!
//! aria2 reads one job per URL line; indented `key=value` lines below a URL
//! override options for that job only.

use crate::directives::DownloadDirective;

/// Renders a single directive as a three-line aria2 job
fn render_directive(directive: &DownloadDirective) -> String {
    format!(
        "{}\n    dir={}\n    out={}\n",
        directive.url, directive.directory, directive.filename
    )
}

/// Renders directives into the contents of an aria2 input file
///
/// Jobs appear in input order, separated by a blank line.
pub fn render_aria2(directives: &[DownloadDirective]) -> String {
    directives
        .iter()
        .map(render_directive)
        .collect::<Vec<_>>()
        .join("\n")
}

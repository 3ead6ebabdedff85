//! Rich diagnostic rendering using codespan-reporting.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use ttl_ast::Span;

/// A source database holding one annotation expression.
pub struct SourceDb {
    files: SimpleFiles<String, String>,
    file_id: usize,
}

impl SourceDb {
    pub fn new(name: String, source: String) -> Self {
        let mut files = SimpleFiles::new();
        let file_id = files.add(name, source);
        Self { files, file_id }
    }

    fn emit(&self, diagnostic: &Diagnostic<usize>) {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = term::Config::default();
        let _ = term::emit(&mut writer.lock(), &config, &self.files, diagnostic);
    }

    /// Report a parse error with source context.
    pub fn report_error(&self, message: &str, span: &Span) {
        let diagnostic = Diagnostic::error().with_message(message).with_labels(vec![
            Label::primary(self.file_id, span.range.clone()),
        ]);
        self.emit(&diagnostic);
    }

    /// Report a validator or evaluator warning with source context.
    pub fn report_warning(&self, message: &str, span: &Span) {
        let diagnostic = Diagnostic::warning()
            .with_message(format!("bad type annotation: {message}"))
            .with_labels(vec![Label::primary(self.file_id, span.range.clone())]);
        self.emit(&diagnostic);
    }
}

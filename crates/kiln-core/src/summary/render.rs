//! Rule tables for the summary line.
//!
//! Each fragment of the line is an ordered list of rules; the first rule whose
//! predicate holds renders the fragment. Keeping the cardinality cases as
//! table rows lets each one be read and tested on its own.

use super::PassClassification;

type Predicate = fn(&PassClassification) -> bool;
type Template = fn(&PassClassification) -> String;

struct Rule {
    when: Predicate,
    render: Template,
}

impl Rule {
    fn new(when: Predicate, render: Template) -> Self {
        Self { when, render }
    }

    fn otherwise(render: Template) -> Self {
        Self { when: |_| true, render }
    }
}

fn apply(rules: &[Rule], c: &PassClassification) -> String {
    rules
        .iter()
        .find(|rule| (rule.when)(c))
        .map(|rule| (rule.render)(c))
        .unwrap_or_default()
}

/// `" into app.js"` / `" into 3 files"`
fn generated_rules() -> [Rule; 3] {
    [
        Rule::new(|c| c.generated.is_empty(), |_| String::new()),
        Rule::new(|c| c.generated.len() == 1, |c| format!(" into {}", c.generated[0])),
        Rule::otherwise(|c| format!(" into {} files", c.generated.len())),
    ]
}

/// `"compiled main.js"` / `"compiled 4"` / `"removed src/a.js"` / `"removed 2"`
fn compiled_rules() -> [Rule; 5] {
    [
        Rule::new(|c| c.compiled.is_empty() && c.removed.is_empty(), |_| String::new()),
        Rule::new(
            |c| c.compiled.is_empty() && c.removed.len() == 1,
            |c| format!("removed {}", c.removed[0]),
        ),
        Rule::new(|c| c.compiled.is_empty(), |c| format!("removed {}", c.removed.len())),
        Rule::new(|c| c.compiled.len() == 1, |c| format!("compiled {}", c.compiled[0])),
        Rule::otherwise(|c| format!("compiled {}", c.compiled.len())),
    ]
}

/// Cached count, and the `files` noun for the compiled count when it is plural.
fn cached_rules() -> [Rule; 5] {
    [
        Rule::new(|c| c.cached == 0 && c.compiled.len() <= 1, |_| String::new()),
        Rule::new(|c| c.cached == 0, |_| " files".to_string()),
        Rule::new(
            |c| c.compiled.is_empty(),
            |c| {
                let noun = if c.generated.len() > 1 { "" } else { " files" };
                format!(" and wrote {} cached{}", c.cached, noun)
            },
        ),
        Rule::new(
            |c| c.compiled.len() == 1,
            |c| {
                let noun = if c.cached == 1 { "file" } else { "files" };
                format!(" and {} cached {}", c.cached, noun)
            },
        ),
        Rule::otherwise(|c| format!(" files and {} cached", c.cached)),
    ]
}

/// `"copied logo.png"` / `"copied 47"` / `"copied 47 files"`
fn copied_rules() -> [Rule; 4] {
    [
        Rule::new(|c| c.copied.is_empty(), |_| String::new()),
        Rule::new(|c| c.copied.len() == 1, |c| format!("copied {}", c.copied[0])),
        Rule::new(|c| !c.compiled.is_empty(), |c| format!("copied {}", c.copied.len())),
        Rule::otherwise(|c| format!("copied {} files", c.copied.len())),
    ]
}

impl PassClassification {
    pub fn generated_fragment(&self) -> String {
        apply(&generated_rules(), self)
    }

    pub fn compiled_fragment(&self) -> String {
        apply(&compiled_rules(), self)
    }

    pub fn cached_fragment(&self) -> String {
        apply(&cached_rules(), self)
    }

    pub fn copied_fragment(&self) -> String {
        apply(&copied_rules(), self)
    }

    /// The summary line without its elapsed-time suffix.
    ///
    /// Falls back to `"compiled"` when nothing at all happened.
    pub fn render(&self) -> String {
        let non_assets = format!(
            "{}{}{}",
            self.compiled_fragment(),
            self.cached_fragment(),
            self.generated_fragment()
        );
        let assets = self.copied_fragment();
        let separator = if !non_assets.is_empty() && !assets.is_empty() {
            ", "
        } else {
            ""
        };

        let main = format!("{}{}{}", non_assets, separator, assets);
        if main.is_empty() {
            "compiled".to_string()
        } else {
            main
        }
    }
}

/// `"{seconds:.1} sec"` above one second, `"{ms} ms"` otherwise.
///
/// Tenths round half up, so 1250 ms reads `1.3 sec`.
pub fn format_elapsed(elapsed_ms: i64) -> String {
    if elapsed_ms > 1000 {
        let tenths = (elapsed_ms as f64 / 100.0).round();
        format!("{:.1} sec", tenths / 10.0)
    } else {
        format!("{} ms", elapsed_ms)
    }
}

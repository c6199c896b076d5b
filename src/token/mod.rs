use crate::Error;
use std::collections::BTreeMap;

/// Convenience methods for lexical analysis of operator definitions.
/// - For splitting a pipeline into steps
/// - For splitting a step into parameters (i.e. key=value-pairs)
/// - For syntactical normalization by eliminating non-significant whitespace
/// - For checking whether a given operator is singular or a pipeline
/// - For checking whether a key is a macro name ("resource name"), and
/// - For accessing the name of a given operator.
pub trait Tokenize {
    /// Split a pipeline definition into steps and a potentially empty docstring
    fn split_into_steps(&self) -> (Vec<String>, String);

    /// Split a step/an operation into parameters. Give special treatment
    /// to names and flags:
    /// ```txt
    /// 'foo bar=baz bonk=blue flag' -> ('name=foo', 'bar=baz', 'bonk=blue', 'flag=true')
    /// ```
    fn split_into_parameters(&self) -> BTreeMap<String, String>;

    /// Glue syntactical elements together, and separate from each other
    /// by a single space:
    ///
    /// 1. Glue key-value pairs together by omitting whitespace around '=':
    ///    ```txt
    ///    key1= value1            key2    =value2  ->  key1=value1 key2=value2
    ///    ```
    /// 2. Trim whitespace on both sides of the macro sigil ':'
    /// 3. Trim whitespace around sequence separators ',' and '|':
    ///    ```txt
    ///     foo | bar baz=bonk   ,    bonk  ->  foo|bar baz=bonk,bonk
    ///    ```
    fn normalize(&self) -> String;

    /// Move a leading `inv` modifier to the end of a step: `inv foo x=1 -> foo x=1 inv`
    fn handle_prefix_modifiers(&self) -> String;

    fn is_pipeline(&self) -> bool;
    fn is_resource_name(&self) -> bool;
    fn operator_name(&self, default: &str) -> String;
}

/// Tokenize implementation for string-like objects
impl<T> Tokenize for T
where
    T: AsRef<str>,
{
    fn split_into_steps(&self) -> (Vec<String>, String) {
        // Impose some line ending sanity
        let all = self
            .as_ref()
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .trim()
            .to_string();

        // Collect docstrings and remove plain comments
        let mut trimmed = String::new();
        let mut docstring = Vec::<String>::new();
        for line in all.lines() {
            let line = line.trim();

            if let Some(doc) = line.strip_prefix("##") {
                docstring.push(doc.trim().to_string());
                continue;
            }

            // Inline comment, full line comment, or no comment at all:
            // Collect everything before `#`
            let content = line.split('#').next().unwrap_or_default();
            trimmed += " ";
            trimmed += content.trim();
        }

        let docstring = docstring.join("\n").trim().to_string();

        // Remove empty steps and other non-significant whitespace
        let steps: Vec<String> = trimmed
            .normalize()
            .split('|')
            .map(|x| x.trim())
            .filter(|x| !x.is_empty())
            .map(|x| x.handle_prefix_modifiers())
            .collect();

        (steps, docstring)
    }

    fn split_into_parameters(&self) -> BTreeMap<String, String> {
        let step = self.normalize();
        let mut params = BTreeMap::new();
        for element in step.split_whitespace() {
            // Split a key=value-pair into key and value parts. Flags are
            // booleans that are true when specified, false when not
            let (key, value) = element.split_once('=').unwrap_or((element, "true"));

            // If the first arg is a key-without-value, it is the name of the operator
            if params.is_empty() && !element.contains('=') {
                params.insert(String::from("name"), String::from(key));
                continue;
            }

            params.insert(String::from(key), String::from(value));
        }

        params
    }

    fn normalize(&self) -> String {
        let elements: Vec<_> = self.as_ref().split_whitespace().collect();
        elements
            .join(" ")
            .replace("= ", "=")
            .replace(": ", ":")
            .replace(", ", ",")
            .replace("| ", "|")
            .replace(" =", "=")
            .replace(" :", ":")
            .replace(" ,", ",")
            .replace(" |", "|")
    }

    fn handle_prefix_modifiers(&self) -> String {
        let step = self.normalize();
        match step.strip_prefix("inv ") {
            Some(rest) if !rest.is_pipeline() => format!("{rest} inv"),
            _ => step,
        }
    }

    fn is_pipeline(&self) -> bool {
        self.as_ref().contains('|')
    }

    fn is_resource_name(&self) -> bool {
        self.operator_name("").contains(':')
    }

    fn operator_name(&self, default: &str) -> String {
        if self.is_pipeline() {
            return default.to_string();
        }
        self.split_into_parameters()
            .get("name")
            .unwrap_or(&default.to_string())
            .to_string()
    }
}

/// Reverse the order of the steps of a pipeline, and toggle the `inv` flag of
/// each step, turning a definition into the definition of its inverse
pub fn invert_definition(definition: &str) -> String {
    let (steps, _) = definition.split_into_steps();
    let inverted: Vec<String> = steps
        .iter()
        .rev()
        .map(|step| {
            let elements: Vec<&str> = step.split_whitespace().collect();
            if elements.contains(&"inv") {
                elements
                    .into_iter()
                    .filter(|e| *e != "inv")
                    .collect::<Vec<_>>()
                    .join(" ")
            } else {
                format!("{step} inv")
            }
        })
        .collect();
    inverted.join(" | ")
}

/// Translate a PROJ pipeline string into the native step syntax.
///
/// PROJ pipeline globals are distributed to each step, an inverted
/// pipeline has its steps reversed, and nested pipelines are rejected.
/// ```txt
/// +proj=pipeline +ellps=intl +step +proj=cart +step +proj=helmert x=1
///  -> cart ellps=intl | helmert ellps=intl x=1
/// ```
pub fn parse_proj(definition: &str) -> Result<String, Error> {
    // Remove the PROJ '+' prefixes and comments
    let all = definition
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" +", " ")
        .trim()
        .trim_start_matches('+')
        .to_string();

    // Pad to make sure we never match "step" as part of a word, like "stepwise"
    let padded = " ".to_string() + &all.normalize() + " ";
    let steps: Vec<&str> = padded
        .split(" step ")
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .collect();

    let mut native_steps = Vec::<String>::new();
    let mut globals = Vec::<String>::new();
    let mut pipeline_is_inverted = false;

    for (index, step) in steps.iter().enumerate() {
        let mut name = None;
        let mut args = Vec::new();
        let mut inverted = false;
        for element in step.split_whitespace() {
            if element.starts_with("init=") {
                return Err(Error::Unsupported(format!(
                    "PROJ init files are not supported: {step}"
                )));
            }
            if let Some(proj) = element.strip_prefix("proj=") {
                name = Some(proj.to_string());
                continue;
            }
            if element == "inv" {
                inverted = true;
                continue;
            }
            args.push(element.to_string());
        }

        // The pipeline head carries the globals, but is not a step itself
        if name.as_deref() == Some("pipeline") {
            if index != 0 {
                return Err(Error::Unsupported(format!(
                    "nested pipelines are not supported: {definition}"
                )));
            }
            pipeline_is_inverted = inverted;
            globals = args;
            continue;
        }

        let Some(name) = name else {
            return Err(Error::Syntax(format!("missing 'proj=' in step: {step}")));
        };

        let mut elements = vec![name];
        if inverted != pipeline_is_inverted {
            elements.push("inv".to_string());
        }
        elements.extend(globals.iter().cloned());
        elements.extend(args);
        native_steps.push(elements.join(" "));
    }

    if pipeline_is_inverted {
        native_steps.reverse();
    }
    Ok(native_steps.join(" | "))
}

/// Does `definition` look like a PROJ string, rather than a native definition?
pub fn is_proj_string(definition: &str) -> bool {
    definition.normalize().split_whitespace().any(|e| {
        e.trim_start_matches('+').starts_with("proj=")
    })
}

// ----- T E S T S ------------------------------------------------------------------

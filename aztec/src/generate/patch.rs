//! In-place patches of existing module files
//!
//! Every patch treats its target as plain text with a conventional shape:
//! idempotency is a substring check, and insertion points are found by
//! scanning for delimiters. They are pure functions over the file content;
//! callers own reading and writing.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use super::TemplateHelpers;

static TOP_LEVEL_USE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^use\s[^;]*;").expect("Invalid regex"));

static NAMESPACE_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^namespace\s[^;{]*;").expect("Invalid regex"));

static REGISTER_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"public\s+function\s+register\s*\([^)]*\)\s*(?::\s*void)?\s*\{").expect("Invalid regex")
});

static OPEN_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<\?php\s*").expect("Invalid regex"));

static RETURN_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"return\s*\[").expect("Invalid regex"));

/// Result of patching a service provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderPatch {
    /// New file content
    Patched(String),
    /// Imports and binding already present
    Unchanged,
    /// The provider has no shape the patch understands
    Skipped(String),
}

/// Result of patching a route file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePatch {
    /// Nothing to do
    Unchanged,
    /// New file content
    Updated(String),
}

/// Naming for an appended REST route block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMeta {
    /// URI prefix of the group (`blog`)
    pub prefix: String,
    /// Route name prefix (`blog.post`)
    pub name: String,
    /// Identifier path parameter (`id`)
    pub parameter: String,
}

impl RouteMeta {
    /// Conventional naming: kebab-case module as prefix, `module.model` names
    /// and an `id` parameter
    ///
    /// ```
    /// use aztec::generate::patch::RouteMeta;
    ///
    /// let meta = RouteMeta::new("BlogAdmin", "PostTag");
    /// assert_eq!(meta.prefix, "blog-admin");
    /// assert_eq!(meta.name, "blog-admin.post-tag");
    /// ```
    #[must_use]
    pub fn new(module: &str, model: &str) -> Self {
        let prefix = TemplateHelpers::to_kebab_case(module);
        let name = format!("{prefix}.{}", TemplateHelpers::to_kebab_case(model));
        Self {
            prefix,
            name,
            parameter: "id".to_string(),
        }
    }
}

/// Import `interface_fqcn` and `impl_fqcn` into a provider and bind them in
/// its `register()` method
///
/// Imports already present are not repeated. When any `Interface::class`
/// reference already exists the binding is considered done. The binding is
/// placed just before the closing brace of `register()`, found by counting
/// braces outside strings and comments.
///
/// ```
/// use aztec::generate::patch::{patch_provider_binding, ProviderPatch};
///
/// let provider = "<?php\n\nnamespace App;\n\nclass P\n{\n    public function register(): void\n    {\n    }\n}\n";
/// let ProviderPatch::Patched(patched) = patch_provider_binding(provider, r"App\IRepo", r"App\Repo") else {
///     panic!("expected a patch");
/// };
/// assert!(patched.contains("use App\\IRepo;\nuse App\\Repo;"));
/// assert!(patched.contains("$this->app->bind(\n            IRepo::class,\n            Repo::class\n        );\n    }"));
/// assert_eq!(patch_provider_binding(&patched, r"App\IRepo", r"App\Repo"), ProviderPatch::Unchanged);
/// ```
#[must_use]
pub fn patch_provider_binding(content: &str, interface_fqcn: &str, impl_fqcn: &str) -> ProviderPatch {
    let mut patched = content.to_string();
    for fqcn in [interface_fqcn, impl_fqcn] {
        patched = add_provider_import(&patched, fqcn);
    }

    let interface = TemplateHelpers::class_basename(interface_fqcn);
    let implementation = TemplateHelpers::class_basename(impl_fqcn);

    if patched.contains(&format!("{interface}::class")) {
        return if patched == content {
            ProviderPatch::Unchanged
        } else {
            ProviderPatch::Patched(patched)
        };
    }

    let Some(signature) = REGISTER_METHOD.find(&patched) else {
        return ProviderPatch::Skipped("no register() method found".to_string());
    };
    let Some(close) = closing_delimiter(&patched, signature.end(), b'{', b'}') else {
        return ProviderPatch::Skipped("register() body is not balanced".to_string());
    };

    let binding = format!(
        "\n        $this->app->bind(\n            {interface}::class,\n            {implementation}::class\n        );"
    );
    let line_start = patched[..close].rfind('\n');
    match line_start {
        Some(newline) if patched[newline + 1..close].trim().is_empty() => {
            patched.insert_str(newline, &binding);
        }
        _ => patched.insert_str(close, &format!("{binding}\n    ")),
    }

    ProviderPatch::Patched(patched)
}

/// Append a REST route group for `controller_fqcn` unless one exists
///
/// The controller import is added after the last top-level `use` line. A
/// file that already references `controller(Controller::class)` only gains
/// the import, if it was missing.
#[must_use]
pub fn append_route_block(content: &str, controller_fqcn: &str, route: &RouteMeta) -> RoutePatch {
    let controller = TemplateHelpers::class_basename(controller_fqcn);
    let mut patched = add_route_import(content, controller_fqcn);

    if !patched.contains(&format!("controller({controller}::class)")) {
        let RouteMeta {
            prefix,
            name,
            parameter,
        } = route;
        patched.push_str(&format!(
            "\n\nRoute::prefix('{prefix}')->group(function () {{\n    Route::controller({controller}::class)->group(function () {{\n        Route::get('/', 'index')->name('{name}.index');\n        Route::post('/', 'store')->name('{name}.store');\n        Route::get('/{{{parameter}}}', 'show')->name('{name}.show');\n        Route::put('/{{{parameter}}}', 'update')->name('{name}.update');\n        Route::delete('/{{{parameter}}}', 'destroy')->name('{name}.destroy');\n    }});\n}});\n"
        ));
    }

    if patched == content {
        RoutePatch::Unchanged
    } else {
        RoutePatch::Updated(patched)
    }
}

/// Register `provider_fqcn` in an application provider list
/// (`bootstrap/providers.php`), appending it to the returned array
///
/// ```
/// use aztec::generate::patch::{register_module_provider, ProviderPatch};
///
/// let list = "<?php\n\nreturn [\n    App\\Providers\\AppServiceProvider::class,\n];\n";
/// let ProviderPatch::Patched(patched) = register_module_provider(list, r"Modules\Blog\Providers\BlogServiceProvider") else {
///     panic!("expected a patch");
/// };
/// assert!(patched.ends_with("AppServiceProvider::class,\n    Modules\\Blog\\Providers\\BlogServiceProvider::class,\n];\n"));
/// ```
#[must_use]
pub fn register_module_provider(content: &str, provider_fqcn: &str) -> ProviderPatch {
    let fqcn = provider_fqcn.trim_start_matches('\\');
    if content.contains(fqcn) {
        return ProviderPatch::Unchanged;
    }

    let Some(open) = RETURN_ARRAY.find(content) else {
        return ProviderPatch::Skipped("no returned provider array found".to_string());
    };
    let Some(close) = closing_delimiter(content, open.end(), b'[', b']') else {
        return ProviderPatch::Skipped("provider array is not balanced".to_string());
    };

    let body = content[..close].trim_end();
    let entry = format!("    {fqcn}::class,");
    let mut patched = String::with_capacity(content.len() + entry.len() + 4);
    patched.push_str(body);
    match body.chars().last() {
        Some('[' | ',') => {}
        _ => patched.push(','),
    }
    patched.push('\n');
    patched.push_str(&entry);
    patched.push('\n');
    patched.push_str(&content[close..]);

    ProviderPatch::Patched(patched)
}

fn add_provider_import(content: &str, fqcn: &str) -> String {
    let statement = format!("use {fqcn};");
    if content.contains(&statement) {
        return content.to_string();
    }

    let anchor = TOP_LEVEL_USE
        .find_iter(content)
        .last()
        .or_else(|| NAMESPACE_DECL.find(content))
        .map(|found| (found.end(), format!("\n{statement}")));

    match anchor {
        Some((end, import)) => insert_at(content, end, &import),
        None => content.replacen("<?php", &format!("<?php\n\n{statement}"), 1),
    }
}

fn add_route_import(content: &str, fqcn: &str) -> String {
    let statement = format!("use {fqcn};");
    if content.contains(&statement) {
        return content.to_string();
    }

    if let Some(last) = TOP_LEVEL_USE.find_iter(content).last() {
        return insert_at(content, last.end(), &format!("\n{statement}"));
    }
    if OPEN_TAG.is_match(content) {
        let opening = format!("<?php\n\n{statement}\n");
        return OPEN_TAG.replace(content, NoExpand(&opening)).into_owned();
    }
    format!("<?php\n\n{statement}\n{content}")
}

fn insert_at(content: &str, at: usize, text: &str) -> String {
    let mut out = String::with_capacity(content.len() + text.len());
    out.push_str(&content[..at]);
    out.push_str(text);
    out.push_str(&content[at..]);
    out
}

/// Byte offset of the `close` delimiter ending a body that opens just before
/// `start`
///
/// Delimiters inside quoted strings and comments are ignored.
fn closing_delimiter(content: &str, start: usize, open: u8, close: u8) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut depth = 1usize;
    let mut pos = start;

    while pos < bytes.len() {
        match bytes[pos] {
            byte if byte == open => depth += 1,
            byte if byte == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            quote @ (b'\'' | b'"') => {
                pos += 1;
                while pos < bytes.len() && bytes[pos] != quote {
                    if bytes[pos] == b'\\' {
                        pos += 1;
                    }
                    pos += 1;
                }
            }
            b'#' => pos = line_end(bytes, pos),
            b'/' if bytes.get(pos + 1) == Some(&b'/') => pos = line_end(bytes, pos),
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                pos = content[pos + 2..].find("*/").map_or(bytes.len(), |end| pos + 2 + end + 1);
            }
            _ => {}
        }
        pos += 1;
    }

    None
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |offset| from + offset)
}

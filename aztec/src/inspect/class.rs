//! Two-tier model introspection
//!
//! [`ClassResolver`] asks an [`Introspector`] for runtime reflection first
//! and falls back to [`StaticIntrospector`] when the class cannot be loaded.
//! Relations found by scanning method bodies ([`scan_relations`]) are always
//! added to whatever the chosen tier reported.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tracing::{debug, warn};

use super::metadata::{ModelMetadata, RelationTarget, Strategy};
use super::source::{first_class, parse_file, SourceResolver};
use crate::config::AztecConfig;
use crate::error::{AztecError, Result};
use crate::php::{ClassDecl, Expr, Visibility};

/// Method names on the model base class that construct relations
pub const RELATION_CONSTRUCTORS: &[&str] = &[
    "hasOne",
    "hasMany",
    "belongsTo",
    "belongsToMany",
    "morphTo",
    "morphOne",
    "morphMany",
    "morphToMany",
    "morphedByMany",
    "hasOneThrough",
    "hasManyThrough",
];

/// Relation classes recognized in declared return types
const RELATION_TYPES: &[&str] = &[
    "HasOne",
    "HasMany",
    "BelongsTo",
    "BelongsToMany",
    "MorphTo",
    "MorphOne",
    "MorphMany",
    "MorphToMany",
    "HasOneThrough",
    "HasManyThrough",
];

/// Array-valued model properties
const LIST_PROPERTIES: &[&str] = &["fillable", "guarded", "hidden", "appends", "with", "translatable"];

/// Class handed to an introspector
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    /// Namespace-qualified class name
    pub fqcn: &'a str,
    /// Source file
    pub path: &'a Path,
    /// Parsed declaration
    pub class: &'a ClassDecl,
}

/// Property values reported by one introspection tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Introspection {
    /// `$casts`
    pub casts: Option<BTreeMap<String, String>>,
    /// `$fillable`
    pub fillable: Option<Vec<String>>,
    /// `$guarded`
    pub guarded: Option<Vec<String>>,
    /// `$hidden`
    pub hidden: Option<Vec<String>>,
    /// `$appends`
    pub appends: Option<Vec<String>>,
    /// `$with`
    pub with: Option<Vec<String>>,
    /// `$connection`
    pub connection: Option<String>,
    /// `$translatable`
    pub translatable: Option<Vec<String>>,
    /// Relation methods this tier could see
    pub relations: BTreeSet<String>,
    /// Related table/key per relation
    pub relation_targets: BTreeMap<String, RelationTarget>,
    /// Diagnostics
    pub notes: Vec<String>,
}

impl Introspection {
    fn list_mut(&mut self, property: &str) -> Option<&mut Option<Vec<String>>> {
        match property {
            "fillable" => Some(&mut self.fillable),
            "guarded" => Some(&mut self.guarded),
            "hidden" => Some(&mut self.hidden),
            "appends" => Some(&mut self.appends),
            "with" => Some(&mut self.with),
            "translatable" => Some(&mut self.translatable),
            _ => None,
        }
    }
}

/// The class could not be introspected by this tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unavailable {
    /// Why the tier gave up
    pub reason: String,
}

impl Unavailable {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// One way of reading model metadata
pub trait Introspector {
    /// Tier reported in [`ModelMetadata::strategy`]
    fn strategy(&self) -> Strategy;

    /// Read the model's declarative properties
    ///
    /// # Errors
    ///
    /// [`Unavailable`] when this tier cannot load the class.
    fn introspect(&self, target: Target<'_>) -> std::result::Result<Introspection, Unavailable>;
}

/// Reflection script run by the PHP binary
///
/// Arguments: autoloader, class name, source file, extra relation names
/// (comma separated) whose targets should be resolved as well.
const REFLECTION_SCRIPT: &str = r#"
error_reporting(0);
[$autoload, $class, $file, $extra] = array_pad(array_slice($argv, 1), 4, '');
require $autoload;
if (!class_exists($class) && is_file($file)) {
    @include_once $file;
}
if (!class_exists($class)) {
    echo json_encode(['loaded' => false, 'reason' => 'class is not autoloadable']);
    exit(0);
}
$ref = new ReflectionClass($class);
$defaults = $ref->getDefaultProperties();
$pick = fn ($name, $fallback) => array_key_exists($name, $defaults) && $defaults[$name] !== null ? $defaults[$name] : $fallback;
$report = [
    'loaded' => true,
    'casts' => (object) $pick('casts', []),
    'fillable' => array_values($pick('fillable', [])),
    'guarded' => array_values($pick('guarded', ['*'])),
    'hidden' => array_values($pick('hidden', [])),
    'appends' => array_values($pick('appends', [])),
    'with' => array_values($pick('with', [])),
    'connection' => $pick('connection', null),
    'translatable' => array_values($pick('translatable', [])),
    'relations' => [],
    'relation_targets' => new stdClass(),
];
$base = 'Illuminate\\Database\\Eloquent\\Relations\\Relation';
foreach ($ref->getMethods(ReflectionMethod::IS_PUBLIC) as $method) {
    $type = $method->getReturnType();
    if ($type instanceof ReflectionNamedType && !$type->isBuiltin() && is_subclass_of($type->getName(), $base)) {
        $report['relations'][] = $method->getName();
    }
}
$instance = null;
try {
    if ($ref->isInstantiable()) {
        $instance = $ref->newInstance();
    }
} catch (Throwable $e) {
}
if ($instance !== null) {
    $names = array_unique(array_merge($report['relations'], array_filter(explode(',', $extra))));
    foreach ($names as $name) {
        try {
            if (!method_exists($instance, $name)) {
                continue;
            }
            $relation = $instance->$name();
            if ($relation instanceof $base) {
                $related = $relation->getRelated();
                $report['relation_targets']->$name = ['table' => $related->getTable(), 'key' => $related->getKeyName()];
            }
        } catch (Throwable $e) {
        }
    }
}
echo json_encode($report);
"#;

#[derive(Debug, Deserialize)]
struct RuntimeReport {
    loaded: bool,
    #[serde(default)]
    reason: Option<String>,
    #[serde(flatten)]
    introspection: Introspection,
}

/// Reflection through a `php` subprocess with the project autoloader
#[derive(Debug, Clone)]
pub struct RuntimeIntrospector {
    enabled: bool,
    php_binary: PathBuf,
    autoload_path: PathBuf,
}

impl RuntimeIntrospector {
    /// Build from configuration
    #[must_use]
    pub fn from_config(config: &AztecConfig) -> Self {
        Self {
            enabled: config.introspection.runtime_enabled,
            php_binary: config.introspection.php_binary.clone(),
            autoload_path: config.autoload_path(),
        }
    }

    /// Build with an explicit binary and autoloader
    #[must_use]
    pub fn new(php_binary: impl Into<PathBuf>, autoload_path: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            php_binary: php_binary.into(),
            autoload_path: autoload_path.into(),
        }
    }

    /// An introspector that always reports the class as not loadable
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            php_binary: PathBuf::from("php"),
            autoload_path: PathBuf::new(),
        }
    }
}

impl Introspector for RuntimeIntrospector {
    fn strategy(&self) -> Strategy {
        Strategy::Runtime
    }

    fn introspect(&self, target: Target<'_>) -> std::result::Result<Introspection, Unavailable> {
        if !self.enabled {
            return Err(Unavailable::new("runtime introspection disabled"));
        }
        if !self.autoload_path.is_file() {
            return Err(Unavailable::new(format!(
                "autoloader not found at {}",
                self.autoload_path.display()
            )));
        }

        let scanned = scan_relations(target.class)
            .into_iter()
            .collect::<Vec<_>>()
            .join(",");

        let output = Command::new(&self.php_binary)
            .arg("-r")
            .arg(REFLECTION_SCRIPT)
            .arg(&self.autoload_path)
            .arg(target.fqcn)
            .arg(target.path)
            .arg(scanned)
            .output()
            .map_err(|err| {
                Unavailable::new(format!("cannot run {}: {err}", self.php_binary.display()))
            })?;

        if !output.status.success() {
            return Err(Unavailable::new(format!(
                "reflection process exited with {}",
                output.status
            )));
        }

        let report: RuntimeReport = serde_json::from_slice(&output.stdout)
            .map_err(|err| Unavailable::new(format!("unreadable reflection report: {err}")))?;

        if !report.loaded {
            return Err(Unavailable::new(
                report.reason.unwrap_or_else(|| "class not found".to_string()),
            ));
        }
        Ok(report.introspection)
    }
}

/// Syntax-tree analysis of property defaults
///
/// Only literals are read. Array elements that are not string literals are
/// dropped, and a property whose default is neither an array nor a string
/// literal is left unknown. Both cases leave a note.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIntrospector;

impl Introspector for StaticIntrospector {
    fn strategy(&self) -> Strategy {
        Strategy::Static
    }

    fn introspect(&self, target: Target<'_>) -> std::result::Result<Introspection, Unavailable> {
        let class = target.class;
        let mut result = Introspection::default();

        for &name in LIST_PROPERTIES {
            let Some(property) = class.property(name) else {
                continue;
            };
            let value = match &property.default {
                Some(Expr::Array(items)) => {
                    let strings: Vec<String> = items
                        .iter()
                        .filter_map(|item| item.value.as_str().map(str::to_string))
                        .collect();
                    if strings.len() < items.len() {
                        result.notes.push(format!(
                            "{name} property: {} non-literal element(s) dropped",
                            items.len() - strings.len()
                        ));
                    }
                    Some(strings)
                }
                Some(Expr::String(value)) => Some(vec![value.clone()]),
                _ => {
                    result.notes.push(non_literal_note(name));
                    None
                }
            };
            if let Some(slot) = result.list_mut(name) {
                *slot = value;
            }
        }

        if let Some(property) = class.property("casts") {
            result.casts = match &property.default {
                Some(Expr::Array(items)) => {
                    let casts: BTreeMap<String, String> = items
                        .iter()
                        .filter_map(|item| {
                            let key = item.key.as_ref()?.as_str()?;
                            Some((key.to_string(), item.value.as_str()?.to_string()))
                        })
                        .collect();
                    if casts.len() < items.len() {
                        result.notes.push(format!(
                            "casts property: {} non-literal element(s) dropped",
                            items.len() - casts.len()
                        ));
                    }
                    Some(casts)
                }
                _ => {
                    result.notes.push(non_literal_note("casts"));
                    None
                }
            };
        }

        if let Some(property) = class.property("connection") {
            match &property.default {
                Some(Expr::String(value)) => result.connection = Some(value.clone()),
                Some(Expr::Const(value)) if value.eq_ignore_ascii_case("null") => {}
                _ => result.notes.push(non_literal_note("connection")),
            }
        }

        result.relations = class
            .methods
            .iter()
            .filter(|m| m.visibility == Visibility::Public && !m.is_static)
            .filter(|m| m.return_type.as_deref().is_some_and(is_relation_type))
            .map(|m| m.name.clone())
            .collect();

        Ok(result)
    }
}

fn non_literal_note(property: &str) -> String {
    format!("{property} property has a non-literal default and was skipped")
}

/// Whether a declared return type names a relation class (`?BelongsTo`,
/// `\Illuminate\...\HasMany`)
fn is_relation_type(declared: &str) -> bool {
    let declared = declared.trim_start_matches('?');
    let basename = declared.rsplit('\\').next().unwrap_or(declared);
    RELATION_TYPES.contains(&basename)
}

fn is_relation_constructor(method: &str) -> bool {
    RELATION_CONSTRUCTORS
        .iter()
        .any(|ctor| ctor.eq_ignore_ascii_case(method))
}

/// Relation methods found by reading method bodies
///
/// A public method is a relation when one of its top-level `return`
/// statements is a call chain rooted at `$this-><constructor>(...)`, such as
/// `return $this->belongsToMany(Tag::class)->withTimestamps();`. Methods
/// that return another relation method (`return $this->comments();`) are
/// relations too.
#[must_use]
pub fn scan_relations(class: &ClassDecl) -> BTreeSet<String> {
    let candidates: Vec<_> = class
        .methods
        .iter()
        .filter(|m| m.visibility == Visibility::Public && !m.is_static)
        .collect();

    let mut relations: BTreeSet<String> = candidates
        .iter()
        .filter(|m| {
            m.returns()
                .filter_map(Expr::this_call)
                .any(|(called, _)| is_relation_constructor(called))
        })
        .map(|m| m.name.clone())
        .collect();

    loop {
        let delegating: Vec<String> = candidates
            .iter()
            .filter(|m| !relations.contains(&m.name))
            .filter(|m| {
                m.returns()
                    .filter_map(Expr::this_call)
                    .any(|(called, _)| relations.iter().any(|r| r.eq_ignore_ascii_case(called)))
            })
            .map(|m| m.name.clone())
            .collect();
        if delegating.is_empty() {
            return relations;
        }
        relations.extend(delegating);
    }
}

/// Produces [`ModelMetadata`] for a model class
pub struct ClassResolver {
    runtime: Box<dyn Introspector>,
    fallback: StaticIntrospector,
}

impl fmt::Debug for ClassResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassResolver")
            .field("runtime", &self.runtime.strategy())
            .finish_non_exhaustive()
    }
}

impl ClassResolver {
    /// Resolver trying `runtime` before static analysis
    #[must_use]
    pub fn new(runtime: impl Introspector + 'static) -> Self {
        Self {
            runtime: Box::new(runtime),
            fallback: StaticIntrospector,
        }
    }

    /// Resolver using the configured PHP binary and autoloader
    #[must_use]
    pub fn from_config(config: &AztecConfig) -> Self {
        Self::new(RuntimeIntrospector::from_config(config))
    }

    /// Resolver that never spawns PHP
    #[must_use]
    pub fn static_only() -> Self {
        Self::new(RuntimeIntrospector::disabled())
    }

    /// Inspect the class `fqcn` declared in `path`
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, or declares no
    /// (named) class. A class that cannot be loaded at runtime is not an
    /// error: static analysis is used instead and a note is recorded.
    pub fn resolve(&self, fqcn: &str, path: &Path) -> Result<ModelMetadata> {
        let file = parse_file(path)?;
        let class = match file
            .classes
            .iter()
            .find(|c| c.fqcn().is_some_and(|name| name.trim_start_matches('\\') == fqcn.trim_start_matches('\\')))
        {
            Some(class) => class,
            None => first_class(&file, path)?,
        };
        let identity = SourceResolver::identify(class, path)?;
        let target = Target {
            fqcn: &identity.fqcn,
            path,
            class,
        };

        let (introspection, strategy, mut notes) = match self.runtime.introspect(target) {
            Ok(introspection) => {
                debug!(fqcn = %identity.fqcn, "using runtime introspection");
                (introspection, self.runtime.strategy(), Vec::new())
            }
            Err(unavailable) => {
                debug!(fqcn = %identity.fqcn, reason = %unavailable, "falling back to static analysis");
                let note = format!("runtime introspection unavailable ({unavailable}); used static analysis");
                let introspection = self.fallback.introspect(target).map_err(|err| {
                    warn!(reason = %err, "static analysis unavailable");
                    AztecError::Parse {
                        path: path.to_path_buf(),
                        line: class.line,
                        message: err.reason,
                    }
                })?;
                (introspection, self.fallback.strategy(), vec![note])
            }
        };

        let mut relations = introspection.relations;
        relations.extend(scan_relations(class));

        notes.extend(identity.notes);
        notes.extend(introspection.notes);

        Ok(ModelMetadata {
            fqcn: identity.fqcn,
            class_name: identity.class_name,
            table: identity.table,
            casts: introspection.casts,
            fillable: introspection.fillable,
            guarded: introspection.guarded,
            hidden: introspection.hidden,
            appends: introspection.appends,
            with: introspection.with,
            connection: introspection.connection,
            translatable: introspection.translatable,
            relations,
            relation_targets: introspection.relation_targets,
            strategy,
            notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::php;
    use std::fs;
    use tempfile::tempdir;

    const POST: &str = r"<?php

namespace Modules\Blog\Models;

use Illuminate\Database\Eloquent\Model;
use Illuminate\Database\Eloquent\Relations\HasMany;

class Post extends Model
{
    protected $fillable = ['title', 'body', self::EXTRA, 'author_id'];

    protected $casts = ['published_at' => 'datetime', 'views' => 'integer'];

    protected $with = ['author'];

    protected $hidden = 'secret';

    protected $appends = self::APPENDS;

    public function author()
    {
        return $this->belongsTo(User::class, 'author_id');
    }

    public function tags()
    {
        return $this->belongsToMany(Tag::class)->withTimestamps();
    }

    public function comments(): HasMany
    {
        return $this->getRelationValue('comments');
    }

    public function writer()
    {
        return $this->author();
    }

    protected function secretRelation()
    {
        return $this->hasOne(Secret::class);
    }

    public function title(): string
    {
        return $this->title;
    }
}
";

    fn parse_class(source: &str) -> ClassDecl {
        php::parse(source).unwrap().classes.remove(0)
    }

    struct FakeRuntime(Introspection);

    impl Introspector for FakeRuntime {
        fn strategy(&self) -> Strategy {
            Strategy::Runtime
        }

        fn introspect(&self, _target: Target<'_>) -> std::result::Result<Introspection, Unavailable> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_scan_relations() {
        let class = parse_class(POST);
        let relations = scan_relations(&class);

        assert_eq!(
            relations.into_iter().collect::<Vec<_>>(),
            vec!["author", "tags", "writer"]
        );
    }

    #[test]
    fn test_static_introspection_reads_literals() {
        let class = parse_class(POST);
        let target = Target {
            fqcn: r"Modules\Blog\Models\Post",
            path: Path::new("Post.php"),
            class: &class,
        };
        let result = StaticIntrospector.introspect(target).unwrap();

        assert_eq!(
            result.fillable,
            Some(vec!["title".to_string(), "body".to_string(), "author_id".to_string()])
        );
        assert_eq!(result.casts.as_ref().map(BTreeMap::len), Some(2));
        assert_eq!(result.hidden, Some(vec!["secret".to_string()]));
        assert_eq!(result.appends, None);
        assert_eq!(result.guarded, None, "undeclared properties stay unknown");
        assert!(result.relations.contains("comments"), "declared return type");
        assert!(result.notes.iter().any(|n| n.starts_with("fillable property")));
        assert!(result.notes.iter().any(|n| n.starts_with("appends property")));
    }

    #[test]
    fn test_relation_type_detection() {
        assert!(is_relation_type("BelongsTo"));
        assert!(is_relation_type("?BelongsTo"));
        assert!(is_relation_type(r"\Illuminate\Database\Eloquent\Relations\HasMany"));
        assert!(!is_relation_type("string"));
    }

    #[test]
    fn test_resolver_falls_back_to_static_analysis() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Post.php");
        fs::write(&path, POST).unwrap();

        let metadata = ClassResolver::static_only()
            .resolve(r"Modules\Blog\Models\Post", &path)
            .unwrap();

        assert_eq!(metadata.strategy, Strategy::Static);
        assert_eq!(metadata.class_name, "Post");
        assert!(metadata.notes[0].contains("runtime introspection unavailable"));
        assert!(metadata.relations.contains("author"));
        assert!(metadata.relations.contains("comments"));
    }

    #[test]
    fn test_resolver_unions_runtime_and_scanned_relations() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Post.php");
        fs::write(&path, POST).unwrap();

        let runtime = Introspection {
            fillable: Some(vec!["title".to_string()]),
            guarded: Some(vec!["*".to_string()]),
            relations: BTreeSet::from(["comments".to_string()]),
            ..Introspection::default()
        };
        let metadata = ClassResolver::new(FakeRuntime(runtime))
            .resolve(r"Modules\Blog\Models\Post", &path)
            .unwrap();

        assert_eq!(metadata.strategy, Strategy::Runtime);
        assert_eq!(metadata.fillable, Some(vec!["title".to_string()]));
        assert_eq!(
            metadata.relations.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["author", "comments", "tags", "writer"]
        );
    }

    #[test]
    fn test_runtime_without_autoloader_is_unavailable() {
        let class = parse_class(POST);
        let runtime = RuntimeIntrospector::new("php", "/nonexistent/vendor/autoload.php");
        let target = Target {
            fqcn: "Post",
            path: Path::new("Post.php"),
            class: &class,
        };

        let err = runtime.introspect(target).unwrap_err();
        assert!(err.reason.contains("autoloader not found"));
    }

    #[test]
    fn test_parse_errors_are_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Broken.php");
        fs::write(&path, "<?php class Broken { public function x() {").unwrap();

        let err = ClassResolver::static_only()
            .resolve("Broken", &path)
            .unwrap_err();
        assert!(matches!(err, AztecError::Parse { .. }));
    }
}

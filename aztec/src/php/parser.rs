//! Declaration-level parser
//!
//! Walks the token stream looking for `namespace` and `class` declarations.
//! Class bodies are parsed into properties and methods; method bodies are
//! split into top-level statements so `return` expressions can be examined.
//! Anything the parser does not model is skipped with balanced delimiters,
//! so unusual code outside class members never causes a failure.

use super::ast::{ArrayItem, ClassDecl, Expr, Method, Property, SourceFile, Stmt, Visibility};
use super::lexer::{tokenize, Token, TokenKind};

/// Parse failure with the offending line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line
    pub line: usize,
    /// Description of the problem
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parse PHP source into a [`SourceFile`]
///
/// # Errors
///
/// Returns [`ParseError`] for lexical errors, unbalanced braces and
/// malformed class declarations.
pub fn parse(source: &str) -> Result<SourceFile, ParseError> {
    let tokens = tokenize(source).map_err(|err| ParseError {
        line: err.line,
        message: err.message,
    })?;
    Parser::new(tokens).parse_file()
}

const MEMBER_MODIFIERS: &[&str] = &[
    "public", "protected", "private", "static", "abstract", "final", "var", "readonly",
];

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

type PResult<T> = Result<T, ParseError>;

impl Parser {
    const fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at_punct(&self, punct: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(punct))
    }

    fn eat_punct(&mut self, punct: &str) -> bool {
        if self.at_punct(punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn current_line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.current_line(),
            message: message.into(),
        }
    }

    fn expect_punct(&mut self, punct: &str) -> PResult<()> {
        if self.eat_punct(punct) {
            return Ok(());
        }
        let found = self
            .peek()
            .map_or_else(|| "end of file".to_string(), |t| format!("'{t}'"));
        Err(self.error(format!("expected '{punct}', found {found}")))
    }

    fn previous(&self) -> Option<&Token> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    fn parse_file(mut self) -> PResult<SourceFile> {
        let mut file = SourceFile::default();
        let mut namespace: Option<String> = None;
        // Brace depth at which a braced namespace block closes
        let mut namespace_block: Option<usize> = None;
        let mut depth = 0usize;

        while let Some(token) = self.peek().cloned() {
            if token.is_keyword("namespace") && self.is_declaration_keyword() {
                self.pos += 1;
                let name = match self.peek().and_then(Token::ident) {
                    Some(name) => {
                        let name = name.trim_start_matches('\\').to_string();
                        self.pos += 1;
                        name
                    }
                    None => String::new(),
                };
                if self.eat_punct("{") {
                    namespace_block = Some(depth);
                    depth += 1;
                } else {
                    self.expect_punct(";")?;
                }
                if file.namespace.is_none() && !name.is_empty() {
                    file.namespace = Some(name.clone());
                }
                namespace = (!name.is_empty()).then_some(name);
                continue;
            }

            if token.is_keyword("class") && self.is_declaration_keyword() {
                let class = self.parse_class(namespace.clone())?;
                file.classes.push(class);
                continue;
            }

            self.pos += 1;
            if token.is_punct("{") {
                depth += 1;
            } else if token.is_punct("}") {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParseError {
                        line: token.line,
                        message: "unmatched '}'".to_string(),
                    })?;
                if namespace_block == Some(depth) {
                    namespace_block = None;
                    namespace = None;
                }
            }
        }

        if depth > 0 {
            return Err(self.error("unexpected end of file, expecting '}'"));
        }
        Ok(file)
    }

    /// `class`/`namespace` at the cursor starts a declaration rather than
    /// `Foo::class`, `new class`, `$x->class` or a relative name
    fn is_declaration_keyword(&self) -> bool {
        let follows_operator = self.previous().is_some_and(|prev| {
            prev.is_punct("::") || prev.is_punct("->") || prev.is_punct("?->") || prev.is_keyword("new")
        });
        !follows_operator && !self.peek_at(1).is_some_and(|t| t.is_punct("("))
    }

    fn parse_class(&mut self, namespace: Option<String>) -> PResult<ClassDecl> {
        let line = self.next().map_or(1, |t| t.line);
        let mut class = ClassDecl {
            namespace,
            line,
            ..ClassDecl::default()
        };

        if let Some(name) = self.peek().and_then(Token::ident) {
            if !name.eq_ignore_ascii_case("extends") && !name.eq_ignore_ascii_case("implements") {
                class.name = Some(name.to_string());
                self.pos += 1;
            }
        }

        if self.peek().is_some_and(|t| t.is_keyword("extends")) {
            self.pos += 1;
            let parent = self
                .next()
                .and_then(|t| t.ident().map(str::to_string))
                .ok_or_else(|| self.error("expected parent class name after 'extends'"))?;
            class.extends = Some(parent);
        }

        if self.peek().is_some_and(|t| t.is_keyword("implements")) {
            self.pos += 1;
            loop {
                let iface = self
                    .next()
                    .and_then(|t| t.ident().map(str::to_string))
                    .ok_or_else(|| self.error("expected interface name after 'implements'"))?;
                class.implements.push(iface);
                if !self.eat_punct(",") {
                    break;
                }
            }
        }

        self.expect_punct("{")?;
        self.parse_class_body(&mut class)?;
        Ok(class)
    }

    fn parse_class_body(&mut self, class: &mut ClassDecl) -> PResult<()> {
        loop {
            let Some(token) = self.peek().cloned() else {
                return Err(self.error("unexpected end of file inside class body"));
            };

            if token.is_punct("}") {
                self.pos += 1;
                return Ok(());
            }
            if token.is_punct(";") {
                self.pos += 1;
                continue;
            }

            let mut visibility = None;
            let mut is_static = false;
            while let Some(modifier) = self
                .peek()
                .and_then(Token::ident)
                .map(str::to_ascii_lowercase)
                .filter(|m| MEMBER_MODIFIERS.contains(&m.as_str()))
            {
                // `static` followed by `::` or `(` is an expression, not a modifier
                if self.peek_at(1).is_some_and(|t| t.is_punct("::") || t.is_punct("(")) {
                    break;
                }
                match modifier.as_str() {
                    "public" | "var" => visibility = Some(Visibility::Public),
                    "protected" => visibility = Some(Visibility::Protected),
                    "private" => visibility = Some(Visibility::Private),
                    "static" => is_static = true,
                    _ => {}
                }
                self.pos += 1;
            }
            let visibility = visibility.unwrap_or_default();

            let Some(token) = self.peek().cloned() else {
                return Err(self.error("unexpected end of file inside class body"));
            };

            if token.is_keyword("use") || token.is_keyword("const") || token.is_keyword("case") {
                self.skip_statement();
            } else if token.is_keyword("function") {
                let method = self.parse_method(visibility, is_static)?;
                class.methods.push(method);
            } else {
                self.parse_properties(class, visibility, is_static)?;
            }
        }
    }

    fn parse_method(&mut self, visibility: Visibility, is_static: bool) -> PResult<Method> {
        let line = self.next().map_or(1, |t| t.line);
        self.eat_punct("&");
        let name = self
            .next()
            .and_then(|t| t.ident().map(str::to_string))
            .ok_or_else(|| self.error("expected method name"))?;

        if !self.at_punct("(") {
            return Err(self.error(format!("expected '(' after method name '{name}'")));
        }
        self.skip_balanced()?;

        let return_type = if self.eat_punct(":") {
            let mut text = String::new();
            while let Some(token) = self.peek() {
                if token.is_punct("{") || token.is_punct(";") {
                    break;
                }
                text.push_str(&token.to_string());
                self.pos += 1;
            }
            Some(text)
        } else {
            None
        };

        let body = if self.eat_punct(";") {
            None
        } else if self.eat_punct("{") {
            Some(self.parse_block_statements()?)
        } else {
            return Err(self.error(format!("expected method body for '{name}'")));
        };

        Ok(Method {
            name,
            visibility,
            is_static,
            return_type,
            body,
            line,
        })
    }

    /// Statements up to and including the closing `}`
    fn parse_block_statements(&mut self) -> PResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        loop {
            let Some(token) = self.peek().cloned() else {
                return Err(self.error("unexpected end of file inside method body"));
            };
            if token.is_punct("}") {
                self.pos += 1;
                return Ok(statements);
            }
            if token.is_keyword("return") {
                self.pos += 1;
                if self.eat_punct(";") {
                    statements.push(Stmt::Return(None));
                    continue;
                }
                let expr = self.parse_expr(&[";"])?;
                self.expect_punct(";")?;
                statements.push(Stmt::Return(Some(expr)));
                continue;
            }
            self.skip_statement_in_body()?;
            statements.push(Stmt::Other);
        }
    }

    /// Skip one statement: ends at `;` or after a `{...}` block at depth 0
    fn skip_statement_in_body(&mut self) -> PResult<()> {
        let mut depth = 0usize;
        while let Some(token) = self.peek().cloned() {
            if depth == 0 && token.is_punct("}") {
                return Ok(());
            }
            if token.is_punct("{") {
                self.skip_balanced()?;
                if depth == 0 {
                    return Ok(());
                }
                continue;
            }
            self.pos += 1;
            if token.is_punct("(") || token.is_punct("[") {
                depth += 1;
            } else if token.is_punct(")") || token.is_punct("]") {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && token.is_punct(";") {
                return Ok(());
            }
        }
        Ok(())
    }

    fn parse_properties(
        &mut self,
        class: &mut ClassDecl,
        visibility: Visibility,
        is_static: bool,
    ) -> PResult<()> {
        // Optional type declaration
        while let Some(token) = self.peek() {
            let is_type_token = token.ident().is_some()
                || ["?", "|", "&", "(", ")"].iter().any(|p| token.is_punct(p));
            if !is_type_token {
                break;
            }
            self.pos += 1;
        }

        loop {
            let token = self
                .next()
                .ok_or_else(|| self.error("unexpected end of file inside class body"))?;
            let TokenKind::Variable(name) = token.kind else {
                return Err(ParseError {
                    line: token.line,
                    message: format!("unexpected '{token}' in class body"),
                });
            };

            let default = if self.eat_punct("=") {
                Some(self.parse_expr(&[",", ";", "{"])?)
            } else {
                None
            };

            class.properties.push(Property {
                name,
                visibility,
                is_static,
                default,
                line: token.line,
            });

            if self.eat_punct(",") {
                continue;
            }
            if self.at_punct("{") {
                // Property hooks
                self.skip_balanced()?;
                return Ok(());
            }
            return self.expect_punct(";");
        }
    }

    /// Skip a class-level statement (`use`, `const`, `case`)
    fn skip_statement(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.next() {
            if token.is_punct("(") || token.is_punct("[") || token.is_punct("{") {
                depth += 1;
            } else if token.is_punct(")") || token.is_punct("]") || token.is_punct("}") {
                depth = depth.saturating_sub(1);
                if depth == 0 && token.is_punct("}") && !self.at_punct(";") {
                    return;
                }
            } else if depth == 0 && token.is_punct(";") {
                return;
            }
        }
    }

    /// Skip from an opening delimiter to its matching close
    fn skip_balanced(&mut self) -> PResult<()> {
        let start_line = self.current_line();
        let mut stack: Vec<&'static str> = Vec::new();
        while let Some(token) = self.next() {
            let TokenKind::Punct(p) = &token.kind else {
                continue;
            };
            match p.as_str() {
                "(" => stack.push(")"),
                "[" => stack.push("]"),
                "{" => stack.push("}"),
                ")" | "]" | "}" => {
                    if stack.pop() != Some(p.as_str()) {
                        return Err(ParseError {
                            line: token.line,
                            message: format!("unbalanced '{p}'"),
                        });
                    }
                }
                _ => {}
            }
            if stack.is_empty() {
                return Ok(());
            }
        }
        Err(ParseError {
            line: start_line,
            message: "unexpected end of file, unclosed delimiter".to_string(),
        })
    }

    /// Parse an expression ending at one of `terminators` (not consumed)
    ///
    /// Structured parsing is attempted first; on anything unusual the raw
    /// tokens up to the terminator are captured as [`Expr::Other`].
    fn parse_expr(&mut self, terminators: &[&str]) -> PResult<Expr> {
        let start = self.pos;
        if let Some(expr) = self.parse_postfix() {
            if self.peek().is_some_and(|t| terminators.iter().any(|p| t.is_punct(p))) {
                return Ok(expr);
            }
        }
        self.pos = start;
        self.raw_until(terminators)
    }

    fn raw_until(&mut self, terminators: &[&str]) -> PResult<Expr> {
        let mut parts = Vec::new();
        loop {
            let Some(token) = self.peek().cloned() else {
                return Err(self.error("unexpected end of file in expression"));
            };
            if terminators.iter().any(|p| token.is_punct(p)) {
                break;
            }
            if token.is_punct("(") || token.is_punct("[") || token.is_punct("{") {
                let from = self.pos;
                self.skip_balanced()?;
                parts.extend(self.tokens[from..self.pos].iter().map(ToString::to_string));
                continue;
            }
            if token.is_punct(")") || token.is_punct("]") || token.is_punct("}") {
                return Err(ParseError {
                    line: token.line,
                    message: format!("unexpected '{token}'"),
                });
            }
            parts.push(token.to_string());
            self.pos += 1;
        }
        Ok(Expr::Other(parts.join(" ")))
    }

    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.at_punct("->") || self.at_punct("?->") {
                self.pos += 1;
                let name = self.next()?.ident()?.to_string();
                if self.at_punct("(") {
                    let args = self.parse_args()?;
                    expr = Expr::MethodCall {
                        target: Box::new(expr),
                        method: name,
                        args,
                    };
                } else {
                    expr = Expr::PropertyFetch {
                        target: Box::new(expr),
                        name,
                    };
                }
            } else {
                return Some(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Str {
                value,
                interpolated: false,
            } => Some(Expr::String(value)),
            TokenKind::Number(n) => Some(Expr::Number(n)),
            TokenKind::Variable(name) => Some(Expr::Variable(name)),
            TokenKind::Punct(p) if p == "[" => {
                let items = self.parse_array_items("]")?;
                Some(Expr::Array(items))
            }
            TokenKind::Punct(p) if p == "-" => match self.next()?.kind {
                TokenKind::Number(n) => Some(Expr::Number(format!("-{n}"))),
                _ => None,
            },
            TokenKind::Ident(name) => self.parse_name_expr(name),
            _ => None,
        }
    }

    fn parse_name_expr(&mut self, name: String) -> Option<Expr> {
        if name.eq_ignore_ascii_case("array") && self.eat_punct("(") {
            let items = self.parse_array_items(")")?;
            return Some(Expr::Array(items));
        }
        if name.eq_ignore_ascii_case("new") {
            let class = self.next()?.ident()?.to_string();
            let args = if self.at_punct("(") {
                self.parse_args()?
            } else {
                Vec::new()
            };
            return Some(Expr::New { class, args });
        }
        if self.eat_punct("::") {
            let member = self.next()?.ident()?.to_string();
            if self.at_punct("(") {
                let args = self.parse_args()?;
                return Some(Expr::StaticCall {
                    class: name,
                    method: member,
                    args,
                });
            }
            return Some(Expr::ClassConst {
                class: name,
                name: member,
            });
        }
        if self.at_punct("(") {
            let args = self.parse_args()?;
            return Some(Expr::FunctionCall { name, args });
        }
        Some(Expr::Const(name))
    }

    /// `( expr, expr )`, cursor on `(`
    fn parse_args(&mut self) -> Option<Vec<Expr>> {
        self.pos += 1;
        let mut args = Vec::new();
        loop {
            if self.eat_punct(")") {
                return Some(args);
            }
            // Named arguments
            if self.peek().and_then(Token::ident).is_some()
                && self.peek_at(1).is_some_and(|t| t.is_punct(":"))
            {
                self.pos += 2;
            }
            args.push(self.parse_expr(&[",", ")"]).ok()?);
            if !self.eat_punct(",") && !self.at_punct(")") {
                return None;
            }
        }
    }

    /// Array elements up to `close`, cursor after the opening delimiter
    fn parse_array_items(&mut self, close: &str) -> Option<Vec<ArrayItem>> {
        let mut items = Vec::new();
        loop {
            if self.eat_punct(close) {
                return Some(items);
            }
            let first = self.parse_expr(&[",", close, "=>"]).ok()?;
            let item = if self.eat_punct("=>") {
                let value = self.parse_expr(&[",", close]).ok()?;
                ArrayItem {
                    key: Some(first),
                    value,
                }
            } else {
                ArrayItem {
                    key: None,
                    value: first,
                }
            };
            items.push(item);
            if !self.eat_punct(",") && !self.at_punct(close) {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r"<?php

namespace Modules\Blog\Models;

use Illuminate\Database\Eloquent\Model;
use Illuminate\Database\Eloquent\Relations\BelongsTo;

#[ObservedBy(PostObserver::class)]
class Post extends Model implements HasMedia
{
    use HasFactory, SoftDeletes {
        SoftDeletes::restore insteadof HasFactory;
    }

    public const STATUS_DRAFT = 'draft';

    protected $table = 'blog_posts';

    protected $fillable = ['title', 'body', 'category_id'];

    protected $casts = [
        'published' => 'boolean',
        'meta' => 'array',
    ];

    protected static $booted = false;

    public function category(): BelongsTo
    {
        if ($this->legacy) {
            return $this->hasOne(Legacy::class);
        }

        return $this->belongsTo(Category::class);
    }

    public function scopePublished($query)
    {
        return $query->where('published', true);
    }

    abstract protected function shape(): string;
}
";

    #[test]
    fn test_parses_namespace_and_class() {
        let file = parse(MODEL).unwrap();
        let class = file.first_class().unwrap();

        assert_eq!(file.namespace.as_deref(), Some(r"Modules\Blog\Models"));
        assert_eq!(class.name.as_deref(), Some("Post"));
        assert_eq!(class.extends.as_deref(), Some("Model"));
        assert_eq!(class.implements, vec!["HasMedia"]);
        assert_eq!(class.fqcn().as_deref(), Some(r"Modules\Blog\Models\Post"));
    }

    #[test]
    fn test_parses_property_defaults() {
        let file = parse(MODEL).unwrap();
        let class = file.first_class().unwrap();

        assert_eq!(
            class.property("table").unwrap().default,
            Some(Expr::String("blog_posts".to_string()))
        );
        let Some(Expr::Array(items)) = &class.property("casts").unwrap().default else {
            panic!("casts should be an array");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].key, Some(Expr::String("published".to_string())));
        assert_eq!(items[0].value, Expr::String("boolean".to_string()));

        assert!(class.property("booted").is_none(), "static properties are skipped");
        assert_eq!(class.property("fillable").unwrap().visibility, Visibility::Protected);
    }

    #[test]
    fn test_only_top_level_returns_are_collected() {
        let file = parse(MODEL).unwrap();
        let class = file.first_class().unwrap();
        let category = class.methods.iter().find(|m| m.name == "category").unwrap();

        let returns: Vec<_> = category.returns().collect();
        assert_eq!(returns.len(), 1);
        let (method, args) = returns[0].this_call().unwrap();
        assert_eq!(method, "belongsTo");
        assert_eq!(
            args,
            [Expr::ClassConst {
                class: "Category".to_string(),
                name: "class".to_string()
            }]
        );
        assert_eq!(category.return_type.as_deref(), Some("BelongsTo"));
    }

    #[test]
    fn test_abstract_method_has_no_body() {
        let file = parse(MODEL).unwrap();
        let class = file.first_class().unwrap();
        let shape = class.methods.iter().find(|m| m.name == "shape").unwrap();
        assert!(shape.body.is_none());
        assert_eq!(shape.visibility, Visibility::Protected);
    }

    #[test]
    fn test_class_constant_fetch_is_not_a_declaration() {
        let file = parse("<?php $x = Foo::class; $y = new class { public $a = 1; };").unwrap();
        assert!(file.classes.is_empty());
    }

    #[test]
    fn test_non_literal_default_is_kept_raw() {
        let file = parse("<?php class A { protected $fillable = self::FIELDS + ['x']; }").unwrap();
        let class = file.first_class().unwrap();
        assert!(matches!(
            class.property("fillable").unwrap().default,
            Some(Expr::Other(_))
        ));
    }

    #[test]
    fn test_chained_relation_call() {
        let file = parse(
            "<?php class A { public function tags() { return $this->belongsToMany(Tag::class)->withTimestamps(); } }",
        )
        .unwrap();
        let method = &file.first_class().unwrap().methods[0];
        let expr = method.returns().next().unwrap();
        assert_eq!(expr.this_call().map(|(m, _)| m), Some("belongsToMany"));
        assert_eq!(expr.chain_root(), &Expr::Variable("this".to_string()));
    }

    #[test]
    fn test_braced_namespace() {
        let file = parse("<?php namespace App { class A {} } namespace { class B {} }").unwrap();
        assert_eq!(file.classes[0].fqcn().as_deref(), Some(r"App\A"));
        assert_eq!(file.classes[1].fqcn().as_deref(), Some("B"));
    }

    #[test]
    fn test_unclosed_class_is_an_error() {
        let err = parse("<?php\nclass A {\n public $a;\n").unwrap_err();
        assert!(err.message.contains("end of file"));
    }

    #[test]
    fn test_unmatched_brace_is_an_error() {
        let err = parse("<?php\n}\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_file_without_class() {
        let file = parse("<?php\nfunction helper() { return 1; }\n").unwrap();
        assert!(file.first_class().is_none());
    }

    const MODERN_MODEL: &str = r#"<?php

namespace App\Models;

enum Status: string
{
    case Draft = 'draft';
    case Live = 'live';
}

final class Article extends Model
{
    protected $fillable = ['title', "status"];

    protected function casts(): array
    {
        return ['published_at' => 'datetime', 'status' => Status::class];
    }

    protected static function booted(): void
    {
        static::creating(function (Article $article) {
            $article->slug = "{$article->title}-$article->id";
            return true;
        });
    }

    protected function title(): Attribute
    {
        return Attribute::make(get: fn (string $value) => ucfirst($value));
    }

    public function summary(): string
    {
        $sql = <<<SQL
            select * from {$this->table} where id = ?
            SQL;
        if ($this->legacy):
            return '';
        endif;

        return $this->author?->name ?? 'anonymous';
    }

    public static function draft(): static
    {
        return new static(['status' => Status::Draft]);
    }

    public function author()
    {
        return $this->belongsTo(User::class, 'author_id');
    }
}
?>
<p>trailing markup</p>
"#;

    #[test]
    fn test_modern_model_declarations() {
        let file = parse(MODERN_MODEL).unwrap();
        assert_eq!(file.classes.len(), 1, "enums are not classes");
        let class = file.first_class().unwrap();
        assert_eq!(class.fqcn().as_deref(), Some(r"App\Models\Article"));

        let Some(Expr::Array(fillable)) = &class.property("fillable").unwrap().default else {
            panic!("fillable should be an array");
        };
        assert_eq!(fillable[1].value, Expr::String("status".to_string()));

        let names: Vec<_> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["casts", "booted", "title", "summary", "draft", "author"]);

        let method = |name: &str| class.methods.iter().find(|m| m.name == name).unwrap();
        let Some(Expr::Array(casts)) = method("casts").returns().next() else {
            panic!("casts() should return an array");
        };
        assert_eq!(casts.len(), 2);
        assert_eq!(method("booted").returns().count(), 0);
        assert_eq!(method("title").returns().count(), 1);
        assert!(method("draft").is_static);

        let author = method("author").returns().next().unwrap();
        assert_eq!(author.this_call().map(|(m, _)| m), Some("belongsTo"));
    }

    #[test]
    fn test_long_array_syntax_and_named_args() {
        let file = parse(
            "<?php class A { protected $hidden = array('password', 'token'); public function owner() { return $this->belongsTo(related: User::class); } }",
        )
        .unwrap();
        let class = file.first_class().unwrap();
        let Some(Expr::Array(items)) = &class.property("hidden").unwrap().default else {
            panic!("hidden should be an array");
        };
        assert_eq!(items.len(), 2);
        let owner = class.methods[0].returns().next().unwrap();
        assert_eq!(owner.this_call().map(|(m, _)| m), Some("belongsTo"));
    }
}

//! Declaration-level syntax tree
//!
//! Only what model inspection needs is modelled: namespaces, classes,
//! properties with their default values, methods and their top-level
//! `return` statements. Everything else is kept as raw text.

/// A parsed PHP file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFile {
    /// First namespace declared in the file
    pub namespace: Option<String>,
    /// Class declarations in source order
    pub classes: Vec<ClassDecl>,
}

impl SourceFile {
    /// First class declared in the file
    #[must_use]
    pub fn first_class(&self) -> Option<&ClassDecl> {
        self.classes.first()
    }
}

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// `public` (also the default when no modifier is written)
    #[default]
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
}

/// A class declaration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassDecl {
    /// Namespace the class was declared in
    pub namespace: Option<String>,
    /// Class name; `None` only for malformed declarations
    pub name: Option<String>,
    /// Parent class as written
    pub extends: Option<String>,
    /// Implemented interfaces as written
    pub implements: Vec<String>,
    /// Declared properties
    pub properties: Vec<Property>,
    /// Declared methods
    pub methods: Vec<Method>,
    /// Line of the `class` keyword
    pub line: usize,
}

impl ClassDecl {
    /// Fully-qualified name (`Namespace\Class`)
    #[must_use]
    pub fn fqcn(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        Some(match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{ns}\\{name}"),
            _ => name.to_string(),
        })
    }

    /// Non-static property by name
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.name == name && !p.is_static)
    }
}

/// A property declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Name without `$`
    pub name: String,
    /// Declared visibility
    pub visibility: Visibility,
    /// Whether the property is `static`
    pub is_static: bool,
    /// Default value expression
    pub default: Option<Expr>,
    /// Declaration line
    pub line: usize,
}

/// A method declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// Method name
    pub name: String,
    /// Declared visibility
    pub visibility: Visibility,
    /// Whether the method is `static`
    pub is_static: bool,
    /// Return type as written
    pub return_type: Option<String>,
    /// Top-level statements; `None` for abstract methods
    pub body: Option<Vec<Stmt>>,
    /// Declaration line
    pub line: usize,
}

impl Method {
    /// Expressions returned by top-level `return` statements
    pub fn returns(&self) -> impl Iterator<Item = &Expr> {
        self.body.iter().flatten().filter_map(|stmt| match stmt {
            Stmt::Return(Some(expr)) => Some(expr),
            _ => None,
        })
    }
}

/// A top-level statement of a method body
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `return <expr>;`
    Return(Option<Expr>),
    /// Anything else
    Other,
}

/// One element of an array literal
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayItem {
    /// Explicit key (`'k' => v`)
    pub key: Option<Expr>,
    /// Element value
    pub value: Expr,
}

/// An expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Non-interpolated string literal
    String(String),
    /// Numeric literal
    Number(String),
    /// Bare constant (`true`, `null`, `SOME_CONST`)
    Const(String),
    /// `[...]` or `array(...)`
    Array(Vec<ArrayItem>),
    /// `Class::NAME` (including `Class::class`)
    ClassConst {
        /// Class as written
        class: String,
        /// Constant name
        name: String,
    },
    /// `$name`
    Variable(String),
    /// `$target->name`
    PropertyFetch {
        /// Object expression
        target: Box<Self>,
        /// Property name
        name: String,
    },
    /// `$target->method(args)`
    MethodCall {
        /// Object expression
        target: Box<Self>,
        /// Method name
        method: String,
        /// Arguments
        args: Vec<Self>,
    },
    /// `Class::method(args)`
    StaticCall {
        /// Class as written
        class: String,
        /// Method name
        method: String,
        /// Arguments
        args: Vec<Self>,
    },
    /// `name(args)`
    FunctionCall {
        /// Function name
        name: String,
        /// Arguments
        args: Vec<Self>,
    },
    /// `new Class(args)`
    New {
        /// Class as written
        class: String,
        /// Arguments
        args: Vec<Self>,
    },
    /// Anything not modelled above, as token text
    Other(String),
}

impl Expr {
    /// String literal value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Innermost receiver of a call chain (`$this` in `$this->a()->b()`)
    #[must_use]
    pub fn chain_root(&self) -> &Self {
        match self {
            Self::MethodCall { target, .. } | Self::PropertyFetch { target, .. } => {
                target.chain_root()
            }
            other => other,
        }
    }

    /// Method calls made directly on `$this` anywhere along a call chain
    ///
    /// For `$this->belongsTo(User::class)->withDefault()` this yields
    /// `belongsTo`.
    #[must_use]
    pub fn this_call(&self) -> Option<(&str, &[Self])> {
        match self {
            Self::MethodCall {
                target,
                method,
                args,
            } => match target.as_ref() {
                Self::Variable(var) if var == "this" => Some((method, args)),
                inner => inner.this_call(),
            },
            _ => None,
        }
    }
}

//! Minimal PHP front end
//!
//! A tokenizer and a declaration-level parser, enough to read Eloquent
//! model classes without executing them: namespace, class name, property
//! defaults and the `return` statements of each method.
//!
//! ```rust
//! use aztec::php;
//!
//! let file = php::parse("<?php namespace App\\Models; class Post { protected $table = 'posts'; }")?;
//! let class = file.first_class().unwrap();
//! assert_eq!(class.fqcn().as_deref(), Some("App\\Models\\Post"));
//! # Ok::<(), php::ParseError>(())
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::{ArrayItem, ClassDecl, Expr, Method, Property, SourceFile, Stmt, Visibility};
pub use lexer::{tokenize, LexError, Token, TokenKind};
pub use parser::{parse, ParseError};

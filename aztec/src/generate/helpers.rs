//! Naming helpers for code generation
//!
//! Case conversions and pluralization used to derive class, variable, table
//! and route names from a model name.

use inflector::Inflector;

/// Naming helpers for placeholder values
pub struct TemplateHelpers;

impl TemplateHelpers {
    /// Convert string to `snake_case`
    ///
    /// # Examples
    ///
    /// ```
    /// # use aztec::generate::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_snake_case("UserProfile"), "user_profile");
    /// assert_eq!(TemplateHelpers::to_snake_case("author"), "author");
    /// ```
    #[must_use]
    pub fn to_snake_case(input: &str) -> String {
        input.to_snake_case()
    }

    /// Convert string to `StudlyCase`
    ///
    /// # Examples
    ///
    /// ```
    /// # use aztec::generate::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_studly_case("user_profile"), "UserProfile");
    /// assert_eq!(TemplateHelpers::to_studly_case("blog"), "Blog");
    /// ```
    #[must_use]
    pub fn to_studly_case(input: &str) -> String {
        input.to_pascal_case()
    }

    /// Convert string to camelCase
    ///
    /// # Examples
    ///
    /// ```
    /// # use aztec::generate::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_camel_case("author"), "author");
    /// assert_eq!(TemplateHelpers::to_camel_case("parent_category"), "parentCategory");
    /// ```
    #[must_use]
    pub fn to_camel_case(input: &str) -> String {
        input.to_camel_case()
    }

    /// Convert string to kebab-case
    ///
    /// # Examples
    ///
    /// ```
    /// # use aztec::generate::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_kebab_case("UserProfile"), "user-profile");
    /// assert_eq!(TemplateHelpers::to_kebab_case("Post"), "post");
    /// ```
    #[must_use]
    pub fn to_kebab_case(input: &str) -> String {
        input.to_kebab_case()
    }

    /// Pluralize a word
    ///
    /// The inflector has known gaps with irregular plurals; model names are
    /// usually regular nouns.
    #[must_use]
    pub fn pluralize(input: &str) -> String {
        input.to_plural()
    }

    /// Plural `StudlyCase` name, pluralizing only the last word
    ///
    /// # Examples
    ///
    /// ```
    /// # use aztec::generate::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::plural_studly("Post"), "Posts");
    /// assert_eq!(TemplateHelpers::plural_studly("BlogCategory"), "BlogCategories");
    /// ```
    #[must_use]
    pub fn plural_studly(input: &str) -> String {
        Self::to_studly_case(&Self::to_table_name(input))
    }

    /// Convert a model name to its conventional table name (`snake_case` plural)
    ///
    /// # Examples
    ///
    /// ```
    /// # use aztec::generate::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_table_name("User"), "users");
    /// assert_eq!(TemplateHelpers::to_table_name("UserProfile"), "user_profiles");
    /// ```
    #[must_use]
    pub fn to_table_name(model: &str) -> String {
        Self::pluralize(&Self::to_snake_case(model))
    }

    /// Lowercase the first character
    #[must_use]
    pub fn lcfirst(input: &str) -> String {
        let mut chars = input.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_lowercase().chain(chars).collect()
        })
    }

    /// Uppercase the first character
    #[must_use]
    pub fn ucfirst(input: &str) -> String {
        crate::inspect::ucfirst(input)
    }

    /// Last segment of a namespace-qualified name
    ///
    /// # Examples
    ///
    /// ```
    /// # use aztec::generate::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::class_basename(r"App\Models\User"), "User");
    /// assert_eq!(TemplateHelpers::class_basename("User"), "User");
    /// ```
    #[must_use]
    pub fn class_basename(fqcn: &str) -> &str {
        fqcn.rsplit('\\').next().unwrap_or(fqcn)
    }
}

//! Input validation rules
//!
//! Every request type that needs checking has a table of [`Rule`]s: the
//! field it guards, the predicate that must hold and the message reported
//! when it does not. Tables are evaluated in order by [`validate`] and the
//! first failing rule wins, so rules can be tested without any persistence.

use crate::errors::ValidationError;
use crate::types::{CreateBlogRequest, RegisterRequest, UpdateBlogRequest};
use validator::ValidateLength;

/// Minimum username length in characters
pub const MIN_USERNAME_LENGTH: u64 = 3;

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: u64 = 3;

pub const USERNAME_TOO_SHORT: &str = "username must be at least 3 characters long";
pub const PASSWORD_TOO_SHORT: &str =
    "password must be given and must be at least 3 characters long";
pub const TITLE_REQUIRED: &str = "title is required";
pub const URL_REQUIRED: &str = "url is required";
pub const LIKES_NEGATIVE: &str = "likes must be a non-negative integer";

/// A single declarative check over an input of type `T`
pub struct Rule<T> {
    pub field: &'static str,
    pub check: fn(&T) -> bool,
    pub message: &'static str,
}

impl<T> Rule<T> {
    /// Apply this rule to an input
    pub fn evaluate(&self, input: &T) -> Result<(), ValidationError> {
        if (self.check)(input) {
            Ok(())
        } else {
            Err(ValidationError::new(self.field, self.message))
        }
    }
}

/// Evaluate `rules` in order, stopping at the first failure
pub fn validate<T>(input: &T, rules: &[Rule<T>]) -> Result<(), ValidationError> {
    rules.iter().try_for_each(|rule| rule.evaluate(input))
}

fn long_enough(value: &str, min: u64) -> bool {
    value.validate_length(Some(min), None, None)
}

fn present(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

fn non_empty_if_given(value: Option<&String>) -> bool {
    value.map_or(true, |v| !v.is_empty())
}

fn non_negative_if_given(value: Option<i64>) -> bool {
    value.map_or(true, |likes| likes >= 0)
}

// ============================================================================
// Registration
// ============================================================================

fn username_long_enough(req: &RegisterRequest) -> bool {
    long_enough(&req.username, MIN_USERNAME_LENGTH)
}

fn password_long_enough(req: &RegisterRequest) -> bool {
    req.password
        .as_deref()
        .is_some_and(|p| long_enough(p, MIN_PASSWORD_LENGTH))
}

/// Rules a registration must satisfy before anything is hashed or stored
pub const REGISTRATION_RULES: &[Rule<RegisterRequest>] = &[
    Rule {
        field: "username",
        check: username_long_enough,
        message: USERNAME_TOO_SHORT,
    },
    Rule {
        field: "password",
        check: password_long_enough,
        message: PASSWORD_TOO_SHORT,
    },
];

// ============================================================================
// Blogs
// ============================================================================

fn create_has_title(req: &CreateBlogRequest) -> bool {
    present(req.title.as_ref())
}

fn create_has_url(req: &CreateBlogRequest) -> bool {
    present(req.url.as_ref())
}

fn create_likes_non_negative(req: &CreateBlogRequest) -> bool {
    non_negative_if_given(req.likes)
}

/// Rules for a new blog
pub const CREATE_BLOG_RULES: &[Rule<CreateBlogRequest>] = &[
    Rule {
        field: "title",
        check: create_has_title,
        message: TITLE_REQUIRED,
    },
    Rule {
        field: "url",
        check: create_has_url,
        message: URL_REQUIRED,
    },
    Rule {
        field: "likes",
        check: create_likes_non_negative,
        message: LIKES_NEGATIVE,
    },
];

fn update_title_not_blank(req: &UpdateBlogRequest) -> bool {
    non_empty_if_given(req.title.as_ref())
}

fn update_url_not_blank(req: &UpdateBlogRequest) -> bool {
    non_empty_if_given(req.url.as_ref())
}

fn update_likes_non_negative(req: &UpdateBlogRequest) -> bool {
    non_negative_if_given(req.likes)
}

/// Rules for a blog update. Omitted fields are left alone, so only the
/// fields actually sent are checked.
pub const UPDATE_BLOG_RULES: &[Rule<UpdateBlogRequest>] = &[
    Rule {
        field: "title",
        check: update_title_not_blank,
        message: TITLE_REQUIRED,
    },
    Rule {
        field: "url",
        check: update_url_not_blank,
        message: URL_REQUIRED,
    },
    Rule {
        field: "likes",
        check: update_likes_non_negative,
        message: LIKES_NEGATIVE,
    },
];

/// Validate a registration request
pub fn validate_registration(req: &RegisterRequest) -> Result<(), ValidationError> {
    validate(req, REGISTRATION_RULES)
}

/// Validate a new blog
pub fn validate_new_blog(req: &CreateBlogRequest) -> Result<(), ValidationError> {
    validate(req, CREATE_BLOG_RULES)
}

/// Validate a blog update
pub fn validate_blog_update(req: &UpdateBlogRequest) -> Result<(), ValidationError> {
    validate(req, UPDATE_BLOG_RULES)
}

#![warn(missing_docs)]

//! Convention-based authorization dispatch.
//!
//! Every entity type that takes part in authorization has exactly one
//! [`Policy`]. A [`Dispatcher`] takes a subject (an entity instance or a bare
//! type marker), the acting user and an [`Action`], finds the policy governing
//! the subject's type and asks it. Policies start out denying everything and
//! override only what they allow.
//!
//! # Quick Example
//!
//! ```rust
//! use pundit::{
//!     Action, Dispatcher, Entity, Kind, Policies, Policy, Query, Scope, Source, Target,
//! };
//!
//! #[derive(Debug)]
//! struct User {
//!     id: u64,
//! }
//!
//! #[derive(Debug)]
//! struct Post {
//!     author: u64,
//! }
//!
//! impl Entity for Post {}
//!
//! #[derive(Debug, PartialEq)]
//! struct Posts {
//!     author: Option<u64>,
//! }
//!
//! impl Query for Posts {
//!     fn origin(&self) -> Kind {
//!         Kind::of::<Post>()
//!     }
//! }
//!
//! struct PostPolicy;
//!
//! impl Policy<User> for PostPolicy {
//!     type Entity = Post;
//!
//!     fn show(&self, _post: Target<'_, Post>, _user: &User) -> bool {
//!         true
//!     }
//!
//!     fn edit(&self, post: Target<'_, Post>, user: &User) -> bool {
//!         post.entity().is_some_and(|post| post.author == user.id)
//!     }
//! }
//!
//! impl Scope<User> for PostPolicy {
//!     type Query = Posts;
//!     type Output = Posts;
//!
//!     fn scope(&self, _source: Source<Posts>, user: &User) -> Posts {
//!         Posts { author: Some(user.id) }
//!     }
//! }
//!
//! let dispatcher = Dispatcher::new(Policies::new().register_scoped(PostPolicy));
//! let alice = User { id: 1 };
//! let post = Post { author: 2 };
//!
//! assert_eq!(dispatcher.can_show(&post, &alice), Ok(true));
//! assert_eq!(dispatcher.can_edit(&post, &alice), Ok(false));
//! assert_eq!(dispatcher.can_delete(Kind::of::<Post>(), &alice), Ok(false));
//!
//! let decision = dispatcher.authorize(&post, &alice, Action::Edit).unwrap();
//! assert_eq!(
//!     decision.denial().map(|denial| denial.message()),
//!     Some("User User { id: 1 } cannot edit? Post { author: 2 }")
//! );
//!
//! let visible: Posts = dispatcher
//!     .scope(Source::Query(Posts { author: None }), &alice)
//!     .unwrap();
//! assert_eq!(visible, Posts { author: Some(1) });
//! ```
//!
//! # Core Concepts
//!
//! ## Subjects
//!
//! A [`Subject`] is what is being checked. It is either a borrowed
//! [`Entity`] instance or a [`Kind`], the marker for the type itself, used
//! when there is no instance yet (listing, creating). Each kind maps to a
//! [`PolicyId`] by appending the `Policy` suffix, e.g. `Post::Policy`.
//!
//! ## Policies and the default-deny template
//!
//! [`Policy`] declares seven checks (`index`, `show`, `create`, `new`,
//! `update`, `edit`, `delete`), all returning `false` unless overridden.
//! Application defined actions go through [`Policy::check`]. A policy may
//! additionally implement [`Scope`] to filter queries.
//!
//! ## Failure kinds
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Subject absent | [`DispatchError::InvalidSubject`] |
//! | No policy, or operation not defined | [`DispatchError::NotDefined`] |
//! | Policy said no | `Ok(false)` / [`Decision::Denied`] |
//! | Policy said no, via [`Dispatcher::enforce`] | [`AuthorizeError::NotAuthorized`] |
//!
//! ## Lazy policies
//!
//! Policies are normally registered up front in [`Policies`]. A [`Resolve`]
//! implementation may supply them on demand instead; the dispatcher forces it
//! before declaring a policy missing.

mod error;
pub use error::*;

mod kind;
pub use kind::*;

mod subject;
pub use subject::*;

mod action;
pub use action::*;

mod decision;
pub use decision::*;

mod policy;
pub use policy::*;

mod scope;
pub use scope::*;

mod registration;
pub use registration::*;

mod registry;
pub use registry::*;

mod dispatcher;
pub use dispatcher::*;

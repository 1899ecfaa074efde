//! The content repository collaborator and scoped admin elevation.

use crate::error::Result;
use crate::introspect::DynamicRecord;
use crate::value::FieldMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// Login the admin identity is loaded by.
pub const DEFAULT_ADMIN_LOGIN: &str = "admin";

/// The content repository fixture managers persist objects through.
///
/// Objects are keyed by an identifier the repository hands out.
pub trait Repository {
    type User: Clone + fmt::Debug;

    fn current_user(&self) -> Self::User;

    fn set_current_user(&mut self, user: Self::User);

    fn load_user_by_login(&self, login: &str) -> Result<Self::User>;

    /// Persist a new object of `type_name`, returning its identifier.
    fn create(&mut self, type_name: &str, fields: &FieldMap) -> Result<String>;

    fn update(&mut self, identifier: &str, fields: &FieldMap) -> Result<()>;

    fn load(&self, identifier: &str) -> Result<DynamicRecord>;

    fn exists(&self, identifier: &str) -> bool {
        self.load(identifier).is_ok()
    }

    fn remove(&mut self, identifier: &str) -> Result<()>;
}

impl<R: Repository + ?Sized> Repository for &mut R {
    type User = R::User;

    fn current_user(&self) -> Self::User {
        (**self).current_user()
    }

    fn set_current_user(&mut self, user: Self::User) {
        (**self).set_current_user(user)
    }

    fn load_user_by_login(&self, login: &str) -> Result<Self::User> {
        (**self).load_user_by_login(login)
    }

    fn create(&mut self, type_name: &str, fields: &FieldMap) -> Result<String> {
        (**self).create(type_name, fields)
    }

    fn update(&mut self, identifier: &str, fields: &FieldMap) -> Result<()> {
        (**self).update(identifier, fields)
    }

    fn load(&self, identifier: &str) -> Result<DynamicRecord> {
        (**self).load(identifier)
    }

    fn exists(&self, identifier: &str) -> bool {
        (**self).exists(identifier)
    }

    fn remove(&mut self, identifier: &str) -> Result<()> {
        (**self).remove(identifier)
    }
}

/// Owns a repository and tracks whether it runs as the admin.
///
/// Most repository writes need an admin. [`IdentityScope::elevate`] swaps the
/// current user for the admin and hands back a guard that puts the previous
/// user back when dropped, on every exit path.
#[derive(Debug)]
pub struct IdentityScope<R: Repository> {
    repository: R,
    admin_login: String,
    prior: Option<R::User>,
}

impl<R: Repository> IdentityScope<R> {
    pub fn new(repository: R) -> Self {
        IdentityScope {
            repository,
            admin_login: DEFAULT_ADMIN_LOGIN.to_string(),
            prior: None,
        }
    }

    pub fn with_admin_login(mut self, login: impl Into<String>) -> Self {
        self.set_admin_login(login);
        self
    }

    pub fn set_admin_login(&mut self, login: impl Into<String>) {
        self.admin_login = login.into();
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    /// Whether an elevation is currently active.
    pub fn is_elevated(&self) -> bool {
        self.prior.is_some()
    }

    /// Run as the admin until the returned guard drops.
    ///
    /// Inside an active elevation this is a no-op: the returned guard
    /// restores nothing and the outer guard stays in charge.
    pub fn elevate(&mut self) -> Result<AdminGuard<'_, R>> {
        if self.prior.is_some() {
            return Ok(AdminGuard {
                scope: self,
                restores: false,
            });
        }

        let admin = self.repository.load_user_by_login(&self.admin_login)?;
        let prior = self.repository.current_user();
        debug!(?prior, login = %self.admin_login, "Elevating to admin");
        self.repository.set_current_user(admin);
        self.prior = Some(prior);

        Ok(AdminGuard {
            scope: self,
            restores: true,
        })
    }

    pub fn into_inner(self) -> R {
        self.repository
    }
}

/// Restores the pre-elevation user on drop.
pub struct AdminGuard<'a, R: Repository> {
    scope: &'a mut IdentityScope<R>,
    restores: bool,
}

impl<R: Repository> AdminGuard<'_, R> {
    /// Whether dropping this guard restores the previous user.
    pub fn restores(&self) -> bool {
        self.restores
    }
}

impl<R: Repository> Deref for AdminGuard<'_, R> {
    type Target = IdentityScope<R>;

    fn deref(&self) -> &Self::Target {
        self.scope
    }
}

impl<R: Repository> DerefMut for AdminGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.scope
    }
}

impl<R: Repository> Drop for AdminGuard<'_, R> {
    fn drop(&mut self) {
        if !self.restores {
            return;
        }
        if let Some(prior) = self.scope.prior.take() {
            debug!(?prior, "Restoring user after admin elevation");
            self.scope.repository.set_current_user(prior);
        }
    }
}

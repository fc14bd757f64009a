//! Which calls are monitored, and with which declaration.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::DeclarationConfig;
use crate::intercept::declaration::Loggable;
use crate::intercept::join_point::JoinPoint;

/// Methods never monitored, whether declared by type or individually.
pub const STRUCTURAL_METHODS: &[&str] = &[
    "fmt",
    "to_string",
    "hash",
    "eq",
    "ne",
    "clone",
    "cmp",
    "partial_cmp",
];

/// Visibility of the method at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Declarations by type and by method.
///
/// A method's own declaration overrides its type's. Only public,
/// non-structural calls are eligible.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    types: HashMap<String, Arc<Loggable>>,
    methods: HashMap<(String, String), Arc<Loggable>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every declaration in `declarations`.
    pub fn from_config(declarations: &[DeclarationConfig]) -> Self {
        let mut registry = Self::new();
        for declaration in declarations {
            let loggable = declaration.to_loggable();
            match &declaration.method {
                Some(method) => registry.declare_method(&declaration.target, method, loggable),
                None => registry.declare_type(&declaration.target, loggable),
            };
        }
        tracing::debug!(
            types = registry.types.len(),
            methods = registry.methods.len(),
            "Declarations loaded"
        );
        registry
    }

    /// Monitor every public method of `declaring_type`.
    pub fn declare_type(
        &mut self,
        declaring_type: impl Into<String>,
        declaration: Loggable,
    ) -> &mut Self {
        self.types
            .insert(declaring_type.into(), Arc::new(declaration));
        self
    }

    /// Monitor one method; overrides a type-level declaration.
    pub fn declare_method(
        &mut self,
        declaring_type: impl Into<String>,
        method: impl Into<String>,
        declaration: Loggable,
    ) -> &mut Self {
        self.methods.insert(
            (declaring_type.into(), method.into()),
            Arc::new(declaration),
        );
        self
    }

    /// The declaration governing a call at `join_point`, if any.
    pub fn resolve(
        &self,
        join_point: &JoinPoint,
        visibility: Visibility,
    ) -> Option<Arc<Loggable>> {
        if visibility != Visibility::Public || STRUCTURAL_METHODS.contains(&join_point.method()) {
            return None;
        }
        let key = (
            join_point.declaring_type().to_string(),
            join_point.method().to_string(),
        );
        self.methods
            .get(&key)
            .or_else(|| self.types.get(join_point.declaring_type()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.types.len() + self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.methods.is_empty()
    }
}

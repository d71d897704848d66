//! Symbol table boundary.
//!
//! The table owns variable declarations: name, domain, category and whether
//! the variable is boolean. The expression model reads it for domain lookups
//! and bound queries; normalization and encoding allocate auxiliary
//! variables through it. Lookup is O(1); iteration follows declaration
//! order so that downstream passes are deterministic.

use crate::ast::{Category, Expr};
use crate::error::{Error, Result};
use crate::range::RangeList;
use rustc_hash::FxHashMap;

/// A declared variable.
#[derive(Debug, Clone)]
pub struct VarInfo {
    /// Variable name, unique within the table.
    pub name: String,
    /// Value domain.
    pub domain: RangeList,
    /// Evaluatability category.
    pub category: Category,
    /// Whether the variable denotes a truth value (domain `{0, 1}`).
    pub is_bool: bool,
    /// For auxiliaries: the printed expression the variable stands for.
    pub origin: Option<String>,
}

/// Variable declarations for one compilation.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    index: FxHashMap<String, usize>,
    infos: Vec<VarInfo>,
    next_aux: u32,
}

impl SymbolTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, info: VarInfo) -> Result<()> {
        if self.index.contains_key(&info.name) {
            return Err(Error::DuplicateVariable(info.name));
        }
        self.index.insert(info.name.clone(), self.infos.len());
        self.infos.push(info);
        Ok(())
    }

    /// Declare an integer variable.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        domain: RangeList,
        category: Category,
    ) -> Result<()> {
        self.insert(VarInfo {
            name: name.into(),
            domain,
            category,
            is_bool: false,
            origin: None,
        })
    }

    /// Declare a boolean variable with the `{0, 1}` domain.
    pub fn declare_bool(&mut self, name: impl Into<String>, category: Category) -> Result<()> {
        self.insert(VarInfo {
            name: name.into(),
            domain: RangeList::bool_domain(),
            category,
            is_bool: true,
            origin: None,
        })
    }

    /// The declared domain, if any.
    #[must_use]
    pub fn domain(&self, name: &str) -> Option<&RangeList> {
        self.info(name).map(|i| &i.domain)
    }

    /// The declared category; `Undeclared` for unknown names.
    #[must_use]
    pub fn category(&self, name: &str) -> Category {
        self.info(name).map_or(Category::Undeclared, |i| i.category)
    }

    /// Whether the variable is boolean; false for unknown names.
    #[must_use]
    pub fn is_bool(&self, name: &str) -> bool {
        self.info(name).is_some_and(|i| i.is_bool)
    }

    /// Full declaration record.
    #[must_use]
    pub fn info(&self, name: &str) -> Option<&VarInfo> {
        self.index.get(name).map(|&i| &self.infos[i])
    }

    /// A reference expression carrying the declared category.
    pub fn reference(&self, name: &str) -> Result<Expr> {
        let info = self
            .info(name)
            .ok_or_else(|| Error::UnknownVariable(name.to_string()))?;
        Ok(Expr::var(info.name.clone(), info.category))
    }

    /// Allocate a fresh integer auxiliary over `domain`, recording the
    /// printed expression it stands for. Generated names start with `#` and
    /// cannot collide with parsed names.
    pub fn new_auxiliary(&mut self, domain: RangeList, origin: String) -> String {
        let name = self.fresh_aux_name();
        self.insert(VarInfo {
            name: name.clone(),
            domain,
            category: Category::Auxiliary,
            is_bool: false,
            origin: Some(origin),
        })
        .expect("generated auxiliary names are unique");
        name
    }

    /// Allocate a fresh boolean auxiliary.
    pub fn new_auxiliary_bool(&mut self, origin: String) -> String {
        let name = self.fresh_aux_name();
        self.insert(VarInfo {
            name: name.clone(),
            domain: RangeList::bool_domain(),
            category: Category::Auxiliary,
            is_bool: true,
            origin: Some(origin),
        })
        .expect("generated auxiliary names are unique");
        name
    }

    fn fresh_aux_name(&mut self) -> String {
        let n = self.next_aux;
        self.next_aux += 1;
        format!("#aux_{n}")
    }

    /// All declarations, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &VarInfo> {
        self.infos.iter()
    }

    /// Declarations visible to the user (auxiliaries excluded).
    pub fn user_vars(&self) -> impl Iterator<Item = &VarInfo> {
        self.infos
            .iter()
            .filter(|i| i.category != Category::Auxiliary)
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Whether the table has no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_declaration_is_rejected() {
        let mut s = SymbolTable::new();
        s.declare("x", RangeList::interval(0, 1), Category::Decision)
            .unwrap();
        assert_eq!(
            s.declare("x", RangeList::interval(0, 9), Category::Decision),
            Err(Error::DuplicateVariable("x".to_string()))
        );
    }

    #[test]
    fn reference_carries_category() {
        let mut s = SymbolTable::new();
        s.declare("x", RangeList::interval(0, 5), Category::Parameter)
            .unwrap();
        let x = s.reference("x").unwrap();
        assert_eq!(x.category(), Category::Parameter);
        assert!(s.reference("y").is_err());
    }

    #[test]
    fn auxiliaries_are_unique_and_hidden() {
        let mut s = SymbolTable::new();
        s.declare("x", RangeList::interval(0, 5), Category::Decision)
            .unwrap();
        let a = s.new_auxiliary(RangeList::interval(0, 10), "sum(1*x, 1*x)".into());
        let b = s.new_auxiliary_bool("or(p, q)".into());
        assert_ne!(a, b);
        assert_eq!(s.category(&a), Category::Auxiliary);
        assert!(s.is_bool(&b));
        assert_eq!(s.info(&a).unwrap().origin.as_deref(), Some("sum(1*x, 1*x)"));
        let visible: Vec<_> = s.user_vars().map(|i| i.name.as_str()).collect();
        assert_eq!(visible, vec!["x"]);
    }

    #[test]
    fn unknown_names_degrade_gracefully() {
        let s = SymbolTable::new();
        assert_eq!(s.category("ghost"), Category::Undeclared);
        assert!(!s.is_bool("ghost"));
        assert!(s.domain("ghost").is_none());
    }
}

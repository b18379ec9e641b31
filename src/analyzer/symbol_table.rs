use std::collections::HashMap;

use super::Type;

/// Name to type map for one compilation unit.
///
/// The language has a single flat namespace, so this is one map. Function
/// bodies get a fresh table of their own (see `SymbolTable::enter_function`).
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    table: HashMap<String, Type>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Inserts or overwrites `name`.
    pub fn declare(&mut self, name: &str, ty: Type) {
        self.table.insert(name.to_string(), ty);
    }

    pub fn get(&self, name: &str) -> Option<Type> {
        self.table.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Swaps in an empty table holding only `params` (all `int`) and returns
    /// the enclosing one, to be handed back to `leave_function`.
    pub fn enter_function<'a>(&mut self, params: impl IntoIterator<Item = &'a str>) -> Self {
        let outer = std::mem::take(self);
        for param in params {
            self.declare(param, Type::Int);
        }
        outer
    }

    pub fn leave_function(&mut self, outer: Self) {
        *self = outer;
    }
}

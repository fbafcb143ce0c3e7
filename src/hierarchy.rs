//! Class hierarchy queries used to resolve calls to a single target.
//!
//! [`ClassHierarchy`] assumes a closed world: every class that can ever receive a call is among
//! the classes it was built from.

use crate::ir::invoke::InvokeType;
use crate::items::{DexMethod, DexType};
use bitflags::bitflags;
use std::collections::{HashMap, HashSet, VecDeque};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AccessFlags: u32 {
        const PUBLIC = 0x1;
        const PRIVATE = 0x2;
        const PROTECTED = 0x4;
        const STATIC = 0x8;
        const FINAL = 0x10;
        const SYNCHRONIZED = 0x20;
        const NATIVE = 0x100;
        const INTERFACE = 0x200;
        const ABSTRACT = 0x400;
        const CONSTRUCTOR = 0x10000;
    }
}

#[derive(Debug, Clone)]
pub struct MethodDefinition {
    pub method: DexMethod,
    pub access: AccessFlags,
    /// Size of the body in code units, `None` for abstract and native methods.
    pub code_size: Option<u32>,
}

impl MethodDefinition {
    pub fn is_abstract(&self) -> bool {
        self.access.contains(AccessFlags::ABSTRACT)
    }

    pub fn is_static(&self) -> bool {
        self.access.contains(AccessFlags::STATIC)
    }

    pub fn is_private(&self) -> bool {
        self.access.contains(AccessFlags::PRIVATE)
    }

    /// Takes part in virtual dispatch.
    pub fn is_virtual(&self) -> bool {
        !self.is_static() && !self.is_private() && !self.method.is_constructor()
    }
}

#[derive(Debug, Clone)]
pub struct ClassDefinition {
    pub class_type: DexType,
    pub super_type: Option<DexType>,
    pub interfaces: Vec<DexType>,
    pub access: AccessFlags,
    pub methods: Vec<MethodDefinition>,
}

impl ClassDefinition {
    pub fn is_interface(&self) -> bool {
        self.access.contains(AccessFlags::INTERFACE)
    }

    pub fn is_abstract(&self) -> bool {
        self.access.intersects(AccessFlags::ABSTRACT | AccessFlags::INTERFACE)
    }

    fn declared(&self, method: &DexMethod) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.method.has_same_signature(method))
    }
}

/// Queries the compiler needs from the program's type hierarchy.
pub trait TypeHierarchy: Sync {
    /// Resolves a call of `kind` to `target`. `receiver` is a more precise class known for the
    /// receiver, if any.
    fn resolve_single_target(
        &self,
        kind: InvokeType,
        target: &DexMethod,
        receiver: Option<&DexType>,
    ) -> Option<DexMethod>;

    /// The definition of exactly `method`, if the program has one.
    fn method_definition(&self, method: &DexMethod) -> Option<&MethodDefinition>;
}

/// A closed-world hierarchy over a fixed set of classes.
#[derive(Debug, Default)]
pub struct ClassHierarchy {
    classes: HashMap<DexType, ClassDefinition>,
    /// Direct subclasses and implementers of each type.
    subtypes: HashMap<DexType, Vec<DexType>>,
}

impl ClassHierarchy {
    pub fn new(classes: Vec<ClassDefinition>) -> Self {
        let mut subtypes: HashMap<DexType, Vec<DexType>> = HashMap::new();
        for class in &classes {
            for parent in class.super_type.iter().chain(class.interfaces.iter()) {
                subtypes.entry(parent.clone()).or_default().push(class.class_type.clone());
            }
        }
        let classes = classes.into_iter().map(|c| (c.class_type.clone(), c)).collect();
        ClassHierarchy { classes, subtypes }
    }

    pub fn class(&self, class_type: &DexType) -> Option<&ClassDefinition> {
        self.classes.get(class_type)
    }

    pub fn is_subtype(&self, sub: &DexType, sup: &DexType) -> bool {
        if sub == sup {
            return true;
        }
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([sub]);
        while let Some(t) = queue.pop_front() {
            if !seen.insert(t) {
                continue;
            }
            if let Some(class) = self.classes.get(t) {
                for parent in class.super_type.iter().chain(class.interfaces.iter()) {
                    if parent == sup {
                        return true;
                    }
                    queue.push_back(parent);
                }
            }
        }
        false
    }

    /// `class_type` and all its transitive subtypes.
    fn subtypes_of<'a>(&'a self, class_type: &'a DexType) -> Vec<&'a DexType> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        let mut queue = VecDeque::from([class_type]);
        while let Some(t) = queue.pop_front() {
            if !seen.insert(t) {
                continue;
            }
            result.push(t);
            if let Some(children) = self.subtypes.get(t) {
                queue.extend(children.iter());
            }
        }
        result
    }

    /// Walks the superclass chain from `class_type` looking for a declaration of `method`.
    fn lookup_in_chain(&self, class_type: &DexType, method: &DexMethod) -> Option<&MethodDefinition> {
        let mut current = Some(class_type);
        while let Some(t) = current {
            let class = self.classes.get(t)?;
            if let Some(found) = class.declared(method) {
                return Some(found);
            }
            current = class.super_type.as_ref();
        }
        None
    }

    /// The implementation a concrete instance of `class_type` runs for `method`.
    fn dispatch(&self, class_type: &DexType, method: &DexMethod) -> Option<&MethodDefinition> {
        self.lookup_in_chain(class_type, method)
            .filter(|m| m.is_virtual())
    }

    fn resolve_virtual(&self, target: &DexMethod, receiver: Option<&DexType>) -> Option<DexMethod> {
        let start = receiver
            .filter(|r| self.is_subtype(r, &target.holder))
            .unwrap_or(&target.holder);
        if !self.classes.contains_key(start) {
            return None;
        }
        let mut implementations: Vec<&DexMethod> = Vec::new();
        for t in self.subtypes_of(start) {
            let class = match self.classes.get(t) {
                Some(class) => class,
                None => continue,
            };
            if class.is_abstract() {
                continue;
            }
            match self.dispatch(t, target) {
                Some(found) if !found.is_abstract() => {
                    if !implementations.contains(&&found.method) {
                        implementations.push(&found.method);
                    }
                }
                // Nothing in the class chain, e.g. an interface default method.
                _ => return None,
            }
        }
        match implementations.as_slice() {
            [single] => Some((*single).clone()),
            _ => None,
        }
    }
}

impl TypeHierarchy for ClassHierarchy {
    fn resolve_single_target(
        &self,
        kind: InvokeType,
        target: &DexMethod,
        receiver: Option<&DexType>,
    ) -> Option<DexMethod> {
        let resolved = match kind {
            InvokeType::Static => Some(
                self.lookup_in_chain(&target.holder, target)
                    .filter(|m| m.is_static())
                    .map(|m| m.method.clone())
                    .unwrap_or_else(|| target.clone()),
            ),
            InvokeType::Direct => Some(
                self.classes
                    .get(&target.holder)
                    .and_then(|c| c.declared(target))
                    .map(|m| m.method.clone())
                    .unwrap_or_else(|| target.clone()),
            ),
            InvokeType::Super => self
                .dispatch(&target.holder, target)
                .filter(|m| !m.is_abstract())
                .map(|m| m.method.clone()),
            InvokeType::Virtual | InvokeType::Interface => self.resolve_virtual(target, receiver),
            InvokeType::NewArray | InvokeType::Custom | InvokeType::Polymorphic => None,
        };
        log::debug!("{} call to {} resolves to {:?}", kind.name(), target, resolved);
        resolved
    }

    fn method_definition(&self, method: &DexMethod) -> Option<&MethodDefinition> {
        self.classes
            .get(&method.holder)
            .and_then(|c| c.methods.iter().find(|m| m.method == *method))
    }
}

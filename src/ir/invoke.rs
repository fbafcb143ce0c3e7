//! The invoke family: one IR instruction kind, tagged by how the call is dispatched.

use crate::dex::error::DexError;
use crate::hierarchy::TypeHierarchy;
use crate::ir::ValueType;
use crate::items::{DexCallSite, DexItem, DexMethod, DexProto, DexType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvokeType {
    Direct,
    Interface,
    Static,
    Super,
    Virtual,
    NewArray,
    Custom,
    Polymorphic,
}

impl InvokeType {
    pub fn name(self) -> &'static str {
        match self {
            InvokeType::Direct => "Direct",
            InvokeType::Interface => "Interface",
            InvokeType::Static => "Static",
            InvokeType::Super => "Super",
            InvokeType::Virtual => "Virtual",
            InvokeType::NewArray => "NewArray",
            InvokeType::Custom => "Custom",
            InvokeType::Polymorphic => "Polymorphic",
        }
    }
}

/// A call, with the target item that belongs to its dispatch kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invoke {
    Direct(DexMethod),
    Interface(DexMethod),
    Static(DexMethod),
    Super(DexMethod),
    Virtual(DexMethod),
    /// `filled-new-array` of the given array type.
    NewArray(DexType),
    Custom(DexCallSite),
    /// `invoke-polymorphic`: the signature-polymorphic method and the call site prototype.
    Polymorphic { method: DexMethod, proto: DexProto },
}

impl Invoke {
    /// Creates the invoke of `kind` calling `target`.
    ///
    /// `proto` is the call site prototype and only used by polymorphic calls. Custom calls are
    /// built with [`Invoke::custom`]; asking for one here, or passing a target of the wrong kind,
    /// is an internal error.
    pub fn create(kind: InvokeType, target: DexItem, proto: Option<DexProto>) -> Result<Invoke, DexError> {
        match (kind, target) {
            (InvokeType::Direct, DexItem::Method(m)) => Ok(Invoke::Direct(m)),
            (InvokeType::Interface, DexItem::Method(m)) => Ok(Invoke::Interface(m)),
            (InvokeType::Static, DexItem::Method(m)) => Ok(Invoke::Static(m)),
            (InvokeType::Super, DexItem::Method(m)) => Ok(Invoke::Super(m)),
            (InvokeType::Virtual, DexItem::Method(m)) => Ok(Invoke::Virtual(m)),
            (InvokeType::NewArray, DexItem::Type(t)) => Ok(Invoke::NewArray(t)),
            (InvokeType::Polymorphic, DexItem::Method(method)) => match proto {
                Some(proto) => Ok(Invoke::Polymorphic { method, proto }),
                None => fail!("Polymorphic invoke of {} without a call site prototype", method),
            },
            (InvokeType::Custom, _) => fail!("Use Invoke::custom instead"),
            (kind, item) => fail!("Invalid {} target {} for a {} invoke", item.kind_name(), item, kind.name()),
        }
    }

    pub fn custom(call_site: DexCallSite) -> Invoke {
        Invoke::Custom(call_site)
    }

    pub fn invoke_type(&self) -> InvokeType {
        match self {
            Invoke::Direct(_) => InvokeType::Direct,
            Invoke::Interface(_) => InvokeType::Interface,
            Invoke::Static(_) => InvokeType::Static,
            Invoke::Super(_) => InvokeType::Super,
            Invoke::Virtual(_) => InvokeType::Virtual,
            Invoke::NewArray(_) => InvokeType::NewArray,
            Invoke::Custom(_) => InvokeType::Custom,
            Invoke::Polymorphic { .. } => InvokeType::Polymorphic,
        }
    }

    /// The referenced item: method, array type or call site.
    pub fn target_item(&self) -> DexItem {
        match self {
            Invoke::Direct(m)
            | Invoke::Interface(m)
            | Invoke::Static(m)
            | Invoke::Super(m)
            | Invoke::Virtual(m)
            | Invoke::Polymorphic { method: m, .. } => DexItem::Method(m.clone()),
            Invoke::NewArray(t) => DexItem::Type(t.clone()),
            Invoke::Custom(call_site) => DexItem::CallSite(call_site.clone()),
        }
    }

    pub fn method(&self) -> Option<&DexMethod> {
        match self {
            Invoke::Direct(m)
            | Invoke::Interface(m)
            | Invoke::Static(m)
            | Invoke::Super(m)
            | Invoke::Virtual(m)
            | Invoke::Polymorphic { method: m, .. } => Some(m),
            Invoke::NewArray(_) | Invoke::Custom(_) => None,
        }
    }

    pub fn call_site_proto(&self) -> Option<&DexProto> {
        match self {
            Invoke::Polymorphic { proto, .. } => Some(proto),
            _ => None,
        }
    }

    pub fn has_receiver(&self) -> bool {
        matches!(
            self,
            Invoke::Direct(_) | Invoke::Interface(_) | Invoke::Super(_) | Invoke::Virtual(_) | Invoke::Polymorphic { .. }
        )
    }

    /// The type the call produces; `V` when it produces nothing.
    pub fn return_type(&self) -> &DexType {
        match self {
            Invoke::Direct(m) | Invoke::Interface(m) | Invoke::Static(m) | Invoke::Super(m) | Invoke::Virtual(m) => {
                &m.proto.return_type
            }
            Invoke::Polymorphic { proto, .. } => &proto.return_type,
            Invoke::NewArray(t) => t,
            Invoke::Custom(call_site) => &call_site.proto.return_type,
        }
    }

    /// Register category of each argument, receiver first. `count` is the number of elements of
    /// a filled-new-array and ignored otherwise.
    pub fn argument_types(&self, count: usize) -> Result<Vec<ValueType>, DexError> {
        let (receiver, parameters) = match self {
            Invoke::Static(m) => (false, &m.proto.parameters),
            Invoke::Direct(m) | Invoke::Interface(m) | Invoke::Super(m) | Invoke::Virtual(m) => {
                (true, &m.proto.parameters)
            }
            Invoke::Polymorphic { proto, .. } => (true, &proto.parameters),
            Invoke::Custom(call_site) => (false, &call_site.proto.parameters),
            Invoke::NewArray(t) => {
                let element = t.element_type().and_then(|e| e.value_type());
                match element {
                    Some(ty) => return Ok(vec![ty; count]),
                    None => fail!("filled-new-array of non array type {}", t),
                }
            }
        };
        let mut types = Vec::with_capacity(parameters.len() + 1);
        if receiver {
            types.push(ValueType::Object);
        }
        for p in parameters {
            match p.value_type() {
                Some(ty) => types.push(ty),
                None => fail!("Parameter of type {} in {}", p, self),
            }
        }
        Ok(types)
    }

    /// Dex mnemonic of the non ranged or ranged form.
    pub fn opcode_name(&self, ranged: bool) -> &'static str {
        match (self.invoke_type(), ranged) {
            (InvokeType::Direct, false) => "invoke-direct",
            (InvokeType::Direct, true) => "invoke-direct/range",
            (InvokeType::Interface, false) => "invoke-interface",
            (InvokeType::Interface, true) => "invoke-interface/range",
            (InvokeType::Static, false) => "invoke-static",
            (InvokeType::Static, true) => "invoke-static/range",
            (InvokeType::Super, false) => "invoke-super",
            (InvokeType::Super, true) => "invoke-super/range",
            (InvokeType::Virtual, false) => "invoke-virtual",
            (InvokeType::Virtual, true) => "invoke-virtual/range",
            (InvokeType::NewArray, false) => "filled-new-array",
            (InvokeType::NewArray, true) => "filled-new-array/range",
            (InvokeType::Custom, false) => "invoke-custom",
            (InvokeType::Custom, true) => "invoke-custom/range",
            (InvokeType::Polymorphic, false) => "invoke-polymorphic",
            (InvokeType::Polymorphic, true) => "invoke-polymorphic/range",
        }
    }

    /// The unique method this call can dispatch to, if the hierarchy proves one.
    ///
    /// Static and direct calls always resolve, to the declared target when the hierarchy has no
    /// definition. `receiver` is a more precise class known for the receiver value.
    pub fn compute_single_target(
        &self,
        hierarchy: &dyn TypeHierarchy,
        receiver: Option<&DexType>,
    ) -> Option<DexMethod> {
        match self {
            Invoke::Static(m) | Invoke::Direct(m) => hierarchy
                .resolve_single_target(self.invoke_type(), m, None)
                .or_else(|| Some(m.clone())),
            Invoke::Super(m) | Invoke::Virtual(m) | Invoke::Interface(m) => {
                hierarchy.resolve_single_target(self.invoke_type(), m, receiver)
            }
            Invoke::NewArray(_) | Invoke::Custom(_) | Invoke::Polymorphic { .. } => None,
        }
    }
}

impl fmt::Display for Invoke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invoke-{} {}", self.invoke_type().name(), self.target_item())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::DexMethodHandle;

    fn method(s: &str) -> DexMethod {
        DexMethod::parse(s).unwrap()
    }

    #[test]
    fn factory_checks_targets() {
        let m = method("LA;->a(IJ)V");
        let invoke = Invoke::create(InvokeType::Virtual, DexItem::Method(m.clone()), None).unwrap();
        assert_eq!(invoke, Invoke::Virtual(m.clone()));
        assert_eq!(invoke.argument_types(0).unwrap(), vec![ValueType::Object, ValueType::Single, ValueType::Wide]);

        let e = Invoke::create(InvokeType::Custom, DexItem::Method(m.clone()), None).unwrap_err();
        assert!(e.is_internal());
        assert_eq!(e.to_string(), "Use Invoke::custom instead");

        let e = Invoke::create(InvokeType::Static, DexItem::Type(DexType::parse("[I").unwrap()), None).unwrap_err();
        assert!(e.is_internal());

        assert!(Invoke::create(InvokeType::Polymorphic, DexItem::Method(m), None).is_err());
    }

    #[test]
    fn new_array_and_custom() {
        let t = DexType::parse("[J").unwrap();
        let invoke = Invoke::create(InvokeType::NewArray, DexItem::Type(t.clone()), None).unwrap();
        assert_eq!(invoke.argument_types(2).unwrap(), vec![ValueType::Wide, ValueType::Wide]);
        assert_eq!(invoke.return_type(), &t);
        assert_eq!(invoke.opcode_name(true), "filled-new-array/range");

        let call_site = DexCallSite {
            method_name: "apply".to_string(),
            proto: DexProto::parse("(Ljava/lang/Object;)I").unwrap(),
            bootstrap: DexMethodHandle("invoke-static@LBoot;->bsm()V".to_string()),
        };
        let invoke = Invoke::custom(call_site);
        assert!(!invoke.has_receiver());
        assert_eq!(invoke.argument_types(0).unwrap(), vec![ValueType::Object]);
        assert_eq!(invoke.return_type().descriptor(), "I");
    }
}

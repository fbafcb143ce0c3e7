//! Dex items referenced from instructions: types, prototypes, fields, methods, call sites and
//! method handles, plus the constant pool that maps them to and from their indices.
//!
//! Items are stored in their smali (JNI) textual form, e.g. `Ljava/lang/Object;` or
//! `Lcom/example/Foo;->bar(IJ)V`.

use crate::dex::error::DexError;
use crate::ir::ValueType;
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_till1};
use nom::character::complete::{char, one_of};
use nom::combinator::{all_consuming, map, recognize};
use nom::multi::{many0, many0_count};
use nom::sequence::{delimited, pair, tuple};
use nom::IResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// A type descriptor such as `I`, `[J` or `Ljava/lang/String;`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DexType(String);

impl DexType
{
    pub fn parse(descriptor: &str) -> Result<DexType, DexError>
    {
        match all_consuming(parse_type_descriptor)(descriptor)
        {
            Ok((_, t)) => Ok(t),
            Err(_) => fail!("Invalid type descriptor {}", descriptor),
        }
    }

    pub fn descriptor(&self) -> &str
    {
        &self.0
    }

    pub fn is_void(&self) -> bool
    {
        self.0 == "V"
    }

    pub fn is_wide(&self) -> bool
    {
        self.0 == "J" || self.0 == "D"
    }

    pub fn is_array(&self) -> bool
    {
        self.0.starts_with('[')
    }

    pub fn is_class(&self) -> bool
    {
        self.0.starts_with('L')
    }

    pub fn is_reference(&self) -> bool
    {
        self.is_array() || self.is_class()
    }

    /// Register category of a value of this type. `None` for `void`.
    pub fn value_type(&self) -> Option<ValueType>
    {
        if self.is_void()
        {
            None
        }
        else if self.is_wide()
        {
            Some(ValueType::Wide)
        }
        else if self.is_reference()
        {
            Some(ValueType::Object)
        }
        else
        {
            Some(ValueType::Single)
        }
    }

    /// Element type of an array type.
    pub fn element_type(&self) -> Option<DexType>
    {
        self.0.strip_prefix('[').map(|e| DexType(e.to_string()))
    }
}

impl fmt::Display for DexType
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

/// A method prototype: return type and parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DexProto
{
    pub return_type: DexType,
    pub parameters: Vec<DexType>,
}

impl DexProto
{
    pub fn parse(descriptor: &str) -> Result<DexProto, DexError>
    {
        match all_consuming(parse_proto)(descriptor)
        {
            Ok((_, p)) => Ok(p),
            Err(_) => fail!("Invalid method prototype {}", descriptor),
        }
    }

    /// Register units needed by the parameters, without any receiver.
    pub fn parameter_registers(&self) -> u32
    {
        self.parameters.iter().map(|p| if p.is_wide() { 2 } else { 1 }).sum()
    }
}

impl fmt::Display for DexProto
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        write!(f, "(")?;
        for p in &self.parameters
        {
            write!(f, "{}", p)?;
        }
        write!(f, "){}", self.return_type)
    }
}

/// A method reference `holder->name(proto)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DexMethod
{
    pub holder: DexType,
    pub name: String,
    pub proto: DexProto,
}

impl DexMethod
{
    pub fn new(holder: DexType, name: &str, proto: DexProto) -> Self
    {
        DexMethod { holder, name: name.to_string(), proto }
    }

    /// Parses the smali form, e.g. `Lcom/example/Foo;->bar(I)V`.
    pub fn parse(smali: &str) -> Result<DexMethod, DexError>
    {
        match all_consuming(parse_method)(smali)
        {
            Ok((_, m)) => Ok(m),
            Err(_) => fail!("Invalid method reference {}", smali),
        }
    }

    /// Same name and prototype, ignoring the holder.
    pub fn has_same_signature(&self, other: &DexMethod) -> bool
    {
        self.name == other.name && self.proto == other.proto
    }

    pub fn with_holder(&self, holder: &DexType) -> DexMethod
    {
        DexMethod { holder: holder.clone(), name: self.name.clone(), proto: self.proto.clone() }
    }

    pub fn is_constructor(&self) -> bool
    {
        self.name == "<init>" || self.name == "<clinit>"
    }
}

impl fmt::Display for DexMethod
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        write!(f, "{}->{}{}", self.holder, self.name, self.proto)
    }
}

/// A field reference `holder->name:type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DexField
{
    pub holder: DexType,
    pub name: String,
    pub field_type: DexType,
}

impl DexField
{
    pub fn parse(smali: &str) -> Result<DexField, DexError>
    {
        match all_consuming(parse_field)(smali)
        {
            Ok((_, field)) => Ok(field),
            Err(_) => fail!("Invalid field reference {}", smali),
        }
    }
}

impl fmt::Display for DexField
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        write!(f, "{}->{}:{}", self.holder, self.name, self.field_type)
    }
}

/// A method handle constant, kept in its textual form (`invoke-static@Lfoo;->bar()V`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DexMethodHandle(pub String);

impl fmt::Display for DexMethodHandle
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

/// An `invoke-custom` call site: the bootstrap handle plus the name and prototype it is linked with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DexCallSite
{
    pub method_name: String,
    pub proto: DexProto,
    pub bootstrap: DexMethodHandle,
}

impl fmt::Display for DexCallSite
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        write!(f, "{}{}@{}", self.method_name, self.proto, self.bootstrap)
    }
}

/// Any item an instruction can reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DexItem
{
    String(String),
    Type(DexType),
    Field(DexField),
    Method(DexMethod),
    Proto(DexProto),
    CallSite(DexCallSite),
    MethodHandle(DexMethodHandle),
}

impl DexItem
{
    pub fn kind_name(&self) -> &'static str
    {
        match self
        {
            DexItem::String(_) => "string",
            DexItem::Type(_) => "type",
            DexItem::Field(_) => "field",
            DexItem::Method(_) => "method",
            DexItem::Proto(_) => "proto",
            DexItem::CallSite(_) => "call site",
            DexItem::MethodHandle(_) => "method handle",
        }
    }
}

impl fmt::Display for DexItem
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match self
        {
            DexItem::String(s) => write!(f, "\"{}\"", s),
            DexItem::Type(t) => write!(f, "{}", t),
            DexItem::Field(x) => write!(f, "{}", x),
            DexItem::Method(m) => write!(f, "{}", m),
            DexItem::Proto(p) => write!(f, "{}", p),
            DexItem::CallSite(c) => write!(f, "{}", c),
            DexItem::MethodHandle(h) => write!(f, "{}", h),
        }
    }
}

pub(crate) fn parse_type_descriptor(input: &str) -> IResult<&str, DexType>
{
    map(
        recognize(pair(
            many0_count(char('[')),
            alt((
                recognize(one_of("ZBSCIJFDV")),
                recognize(delimited(char('L'), is_not(";"), char(';'))),
            )),
        )),
        |d: &str| DexType(d.to_string()),
    )(input)
}

pub(crate) fn parse_proto(input: &str) -> IResult<&str, DexProto>
{
    map(
        pair(delimited(char('('), many0(parse_type_descriptor), char(')')), parse_type_descriptor),
        |(parameters, return_type)| DexProto { return_type, parameters },
    )(input)
}

fn parse_method(input: &str) -> IResult<&str, DexMethod>
{
    map(
        tuple((parse_type_descriptor, tag("->"), take_till1(|c| c == '('), parse_proto)),
        |(holder, _, name, proto)| DexMethod { holder, name: name.to_string(), proto },
    )(input)
}

fn parse_field(input: &str) -> IResult<&str, DexField>
{
    map(
        tuple((parse_type_descriptor, tag("->"), take_till1(|c| c == ':'), char(':'), parse_type_descriptor)),
        |(holder, _, name, _, field_type)| DexField { holder, name: name.to_string(), field_type },
    )(input)
}

/// Resolves pool indices found in decoded instructions into items.
pub trait ItemResolver
{
    fn string(&self, idx: u32) -> Option<String>;
    fn type_item(&self, idx: u32) -> Option<DexType>;
    fn field(&self, idx: u32) -> Option<DexField>;
    fn method(&self, idx: u32) -> Option<DexMethod>;
    fn proto(&self, idx: u32) -> Option<DexProto>;
    fn call_site(&self, idx: u32) -> Option<DexCallSite>;
    fn method_handle(&self, idx: u32) -> Option<DexMethodHandle>;
}

/// Maps items back to pool indices when lowering.
pub trait IndexResolver
{
    fn string_index(&self, value: &str) -> Option<u32>;
    fn type_index(&self, t: &DexType) -> Option<u32>;
    fn field_index(&self, field: &DexField) -> Option<u32>;
    fn method_index(&self, method: &DexMethod) -> Option<u32>;
    fn proto_index(&self, proto: &DexProto) -> Option<u32>;
    fn call_site_index(&self, call_site: &DexCallSite) -> Option<u32>;
    fn method_handle_index(&self, handle: &DexMethodHandle) -> Option<u32>;
}

/// One indexed section of the pool.
#[derive(Debug, Clone)]
struct Section<T>
{
    items: Vec<T>,
    indices: HashMap<T, u32>,
}

impl<T: Clone + Eq + Hash> Section<T>
{
    fn new() -> Self
    {
        Section { items: Vec::new(), indices: HashMap::new() }
    }

    fn intern(&mut self, item: T) -> u32
    {
        if let Some(idx) = self.indices.get(&item)
        {
            return *idx;
        }
        let idx = self.items.len() as u32;
        self.items.push(item.clone());
        self.indices.insert(item, idx);
        idx
    }

    fn get(&self, idx: u32) -> Option<T>
    {
        self.items.get(idx as usize).cloned()
    }

    fn index_of(&self, item: &T) -> Option<u32>
    {
        self.indices.get(item).copied()
    }
}

/// An in-memory constant pool that serves both lookup directions.
#[derive(Debug, Clone)]
pub struct ConstantPool
{
    strings: Section<String>,
    types: Section<DexType>,
    fields: Section<DexField>,
    methods: Section<DexMethod>,
    protos: Section<DexProto>,
    call_sites: Section<DexCallSite>,
    method_handles: Section<DexMethodHandle>,
}

impl Default for ConstantPool
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl ConstantPool
{
    pub fn new() -> Self
    {
        ConstantPool {
            strings: Section::new(),
            types: Section::new(),
            fields: Section::new(),
            methods: Section::new(),
            protos: Section::new(),
            call_sites: Section::new(),
            method_handles: Section::new(),
        }
    }

    pub fn add_string(&mut self, s: &str) -> u32
    {
        self.strings.intern(s.to_string())
    }

    pub fn add_type(&mut self, t: &DexType) -> u32
    {
        self.types.intern(t.clone())
    }

    pub fn add_field(&mut self, field: &DexField) -> u32
    {
        self.types.intern(field.holder.clone());
        self.types.intern(field.field_type.clone());
        self.fields.intern(field.clone())
    }

    pub fn add_method(&mut self, method: &DexMethod) -> u32
    {
        self.types.intern(method.holder.clone());
        self.add_proto(&method.proto);
        self.methods.intern(method.clone())
    }

    pub fn add_proto(&mut self, proto: &DexProto) -> u32
    {
        self.types.intern(proto.return_type.clone());
        for p in &proto.parameters
        {
            self.types.intern(p.clone());
        }
        self.protos.intern(proto.clone())
    }

    pub fn add_call_site(&mut self, call_site: &DexCallSite) -> u32
    {
        self.add_proto(&call_site.proto);
        self.method_handles.intern(call_site.bootstrap.clone());
        self.call_sites.intern(call_site.clone())
    }

    pub fn add_method_handle(&mut self, handle: &DexMethodHandle) -> u32
    {
        self.method_handles.intern(handle.clone())
    }
}

impl ItemResolver for ConstantPool
{
    fn string(&self, idx: u32) -> Option<String>
    {
        self.strings.get(idx)
    }

    fn type_item(&self, idx: u32) -> Option<DexType>
    {
        self.types.get(idx)
    }

    fn field(&self, idx: u32) -> Option<DexField>
    {
        self.fields.get(idx)
    }

    fn method(&self, idx: u32) -> Option<DexMethod>
    {
        self.methods.get(idx)
    }

    fn proto(&self, idx: u32) -> Option<DexProto>
    {
        self.protos.get(idx)
    }

    fn call_site(&self, idx: u32) -> Option<DexCallSite>
    {
        self.call_sites.get(idx)
    }

    fn method_handle(&self, idx: u32) -> Option<DexMethodHandle>
    {
        self.method_handles.get(idx)
    }
}

impl IndexResolver for ConstantPool
{
    fn string_index(&self, value: &str) -> Option<u32>
    {
        self.strings.index_of(&value.to_string())
    }

    fn type_index(&self, t: &DexType) -> Option<u32>
    {
        self.types.index_of(t)
    }

    fn field_index(&self, field: &DexField) -> Option<u32>
    {
        self.fields.index_of(field)
    }

    fn method_index(&self, method: &DexMethod) -> Option<u32>
    {
        self.methods.index_of(method)
    }

    fn proto_index(&self, proto: &DexProto) -> Option<u32>
    {
        self.protos.index_of(proto)
    }

    fn call_site_index(&self, call_site: &DexCallSite) -> Option<u32>
    {
        self.call_sites.index_of(call_site)
    }

    fn method_handle_index(&self, handle: &DexMethodHandle) -> Option<u32>
    {
        self.method_handles.index_of(handle)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn type_descriptors()
    {
        let t = DexType::parse("[[Ljava/lang/String;").unwrap();
        assert!(t.is_array());
        assert_eq!(t.element_type().unwrap().descriptor(), "[Ljava/lang/String;");
        assert_eq!(t.value_type(), Some(ValueType::Object));
        assert_eq!(DexType::parse("J").unwrap().value_type(), Some(ValueType::Wide));
        assert_eq!(DexType::parse("F").unwrap().value_type(), Some(ValueType::Single));
        assert_eq!(DexType::parse("V").unwrap().value_type(), None);
        assert!(DexType::parse("Lfoo").is_err());
        assert!(DexType::parse("II").is_err());
    }

    #[test]
    fn method_references()
    {
        let m = DexMethod::parse("Linlining/A;->cannotInline(IJ[Z)I").unwrap();
        assert_eq!(m.holder.descriptor(), "Linlining/A;");
        assert_eq!(m.name, "cannotInline");
        assert_eq!(m.proto.parameters.len(), 3);
        assert_eq!(m.proto.parameter_registers(), 4);
        assert_eq!(m.proto.return_type.descriptor(), "I");
        assert_eq!(m.to_string(), "Linlining/A;->cannotInline(IJ[Z)I");
        assert!(DexMethod::parse("Linlining/A;->(I)V").is_err());
    }

    #[test]
    fn field_references()
    {
        let f = DexField::parse("Linlining/A;->a:I").unwrap();
        assert_eq!(f.name, "a");
        assert_eq!(f.field_type.descriptor(), "I");
        assert_eq!(f.to_string(), "Linlining/A;->a:I");
    }

    #[test]
    fn pool_round_trips_indices()
    {
        let mut pool = ConstantPool::new();
        let m = DexMethod::parse("LA;->a()I").unwrap();
        let idx = pool.add_method(&m);
        assert_eq!(pool.add_method(&m), idx);
        assert_eq!(pool.method(idx), Some(m.clone()));
        assert_eq!(pool.method_index(&m), Some(idx));
        assert!(pool.type_index(&DexType::parse("LA;").unwrap()).is_some());
        assert_eq!(pool.method(idx + 1), None);
        let s = pool.add_string("hello");
        assert_eq!(pool.string_index("hello"), Some(s));
    }
}

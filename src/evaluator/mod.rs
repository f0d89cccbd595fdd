//! Type evaluator
//!
//! Turns an expression tree into a [`Type`]. Names are looked up in the current loader of the
//! [`Pcore`] context; `type Name = <expr>` declares an alias whose expression is evaluated when
//! the alias is first needed. An alias being evaluated is seen by its own body as a reference,
//! so recursive aliases terminate.

pub mod access;

use crate::context::Pcore;
use crate::error::{Result, TypeAssertionError, TypeResolverError, ValidationError};
use crate::frontend::{self, Expr, Literal};
use crate::loader::TypedName;
use crate::types::factory::{object, type_alias, type_reference, type_reference_to, type_set};
use crate::types::{ObjectType, Type, TypeKind as K, TypeSetType};
use crate::util::diagnostic::codes;
use crate::util::span::Span;
use crate::values::{Value, ValueMap};

const KEY_TYPES: &str = "types";
const KEY_REFERENCES: &str = "references";
const KEY_NAME: &str = "name";
const KEY_NAME_AUTHORITY: &str = "name_authority";

fn illegal_expression(
    expr: &Expr,
    feature: &str,
    container: &str,
) -> crate::error::PcoreError {
    ValidationError::new(
        codes::issue(codes::VALIDATE_ILLEGAL_EXPRESSION)
            .param("expression", expr.kind_name())
            .param("feature", feature.to_string())
            .param("container", container.to_string()),
        expr.span(),
    )
    .into()
}

/// Evaluates expressions to types in the scope of a [`Pcore`] context
pub struct TypeEvaluator<'a> {
    pcore: &'a Pcore,
    /// Identities of the aliases whose bodies are being evaluated
    in_progress: Vec<usize>,
}

impl<'a> TypeEvaluator<'a> {
    pub fn new(pcore: &'a Pcore) -> Self {
        Self {
            pcore,
            in_progress: Vec::new(),
        }
    }

    /// Parse and evaluate `source`. The result must be a type, and it must not be a name that
    /// nothing is bound to.
    pub fn resolve_type(
        &mut self,
        source: &str,
    ) -> Result<Type> {
        let expr = frontend::parse_str(source)?;
        let t = self.resolve_type_expr(&expr)?;
        if let K::Reference(reference) = t.kind() {
            if reference.target().is_none() {
                return Err(
                    TypeResolverError::new(format!("Reference to unresolved type '{}'", reference.name)).into(),
                );
            }
        }
        Ok(t)
    }

    /// Evaluate `expr`, which must produce a type
    pub fn resolve_type_expr(
        &mut self,
        expr: &Expr,
    ) -> Result<Type> {
        match self.resolve(expr)? {
            Value::Type(t) => Ok(t),
            other => Err(TypeAssertionError::new(
                "",
                format!("The expression '{}' does not evaluate to a Type, got {}", expr, other.kind_name()),
            )
            .into()),
        }
    }

    /// Declare the alias `name` for `expr` in the current loader. The expression is evaluated
    /// later.
    pub fn declare_type(
        &mut self,
        name: &str,
        expr: Expr,
        name_authority: Option<&str>,
    ) -> Result<Type> {
        let alias = type_alias(name, expr);
        self.bind_by_name(name, alias.clone(), name_authority)?;
        tracing::debug!(name, "declared type alias");
        Ok(alias)
    }

    /// Bind `t` to `qname` in the current loader, under the loader's authority unless one is
    /// given
    pub fn bind_by_name(
        &mut self,
        qname: &str,
        t: Type,
        name_authority: Option<&str>,
    ) -> Result<()> {
        let loader = self.pcore.loader();
        let authority = name_authority.unwrap_or(loader.name_authority());
        loader.bind(TypedName::type_name_in(qname, authority), t)?;
        Ok(())
    }

    /// Evaluate an expression to a value. Type names and access expressions yield types;
    /// literals, arrays and hashes yield their values.
    pub fn resolve(
        &mut self,
        expr: &Expr,
    ) -> Result<Value> {
        match expr {
            Expr::Literal(literal, _) => Ok(literal_value(literal)),
            Expr::Identifier(name, _) => Ok(Value::String(name.clone())),
            Expr::Heredoc { text, .. } => Ok(Value::String(text.clone())),
            Expr::Regexp(source, _) => Ok(Value::Regexp(source.clone())),
            Expr::TypeName(name, _) => self.resolve_name(name).map(Value::Type),
            Expr::TypeDeclaration(name, _) => self.pcore.load_type(name).map(Value::Type).ok_or_else(|| {
                TypeResolverError::new(format!("Type '{}' is not declared", name)).into()
            }),
            Expr::Array(items, _) => items
                .iter()
                .map(|item| self.resolve_rvalue(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Expr::Hash(entries, _) => {
                let mut hash = ValueMap::with_capacity(entries.len());
                for (key, value) in entries {
                    let key = self.resolve_rvalue(key)?;
                    let value = self.resolve_rvalue(value)?;
                    hash.insert(key, value);
                }
                Ok(Value::Hash(hash))
            }
            Expr::Access { target, params, .. } => self.resolve_access(target, params, None).map(Value::Type),
            Expr::Assignment { lhs, rhs, span } => self.resolve_assignment(lhs, rhs, *span).map(Value::Type),
            Expr::Negate(operand, _) => match self.resolve(operand)? {
                Value::Integer(n) => n
                    .checked_neg()
                    .map(Value::Integer)
                    .ok_or_else(|| illegal_expression(operand, "operand", "Unary Minus")),
                Value::Float(x) => Ok(Value::Float(-x)),
                _ => Err(illegal_expression(operand, "operand", "Unary Minus")),
            },
            Expr::FunctionDefinition { .. } | Expr::NodeDefinition { .. } => {
                Err(illegal_expression(expr, "a type", "a type expression"))
            }
        }
    }

    /// Evaluate an expression nested in a value position
    fn resolve_rvalue(
        &mut self,
        expr: &Expr,
    ) -> Result<Value> {
        match expr {
            Expr::Assignment { .. } | Expr::TypeDeclaration(..) => Err(ValidationError::new(
                codes::issue(codes::VALIDATE_NOT_RVALUE).param("expression", expr.kind_name()),
                expr.span(),
            )
            .into()),
            _ => self.resolve(expr),
        }
    }

    /// Init hash keys: a capitalized name is the name itself, not the type it names
    fn resolve_key(
        &mut self,
        expr: &Expr,
    ) -> Result<Value> {
        match expr {
            Expr::TypeName(name, _) => Ok(Value::String(name.clone())),
            _ => self.resolve_rvalue(expr),
        }
    }

    fn resolve_assignment(
        &mut self,
        lhs: &Expr,
        rhs: &Expr,
        span: Span,
    ) -> Result<Type> {
        let issue = match lhs {
            Expr::TypeDeclaration(name, _) => {
                let alias = self.declare_type(name, rhs.clone(), None)?;
                self.resolve_alias(&alias)?;
                return Ok(alias);
            }
            Expr::Literal(Literal::Integer(_) | Literal::Float(_), _) => {
                codes::issue(codes::VALIDATE_ILLEGAL_NUMERIC_ASSIGNMENT).param("value", lhs.to_string())
            }
            Expr::Access { .. } => codes::issue(codes::VALIDATE_ILLEGAL_ASSIGNMENT_VIA_INDEX),
            Expr::Identifier(name, _) if name.contains("::") => {
                codes::issue(codes::VALIDATE_CROSS_SCOPE_ASSIGNMENT).param("name", name.clone())
            }
            _ => return Err(illegal_expression(lhs, "left operand", "Assignment")),
        };
        Err(ValidationError::new(issue, span).into())
    }

    /// The type bound to `name`, evaluating a declared alias on first use. Unknown names
    /// yield an unresolved reference.
    fn resolve_name(
        &mut self,
        name: &str,
    ) -> Result<Type> {
        let loader = self.pcore.loader();
        let Some(t) = loader.load(&TypedName::type_name_in(name, loader.name_authority())) else {
            return Ok(type_reference(name));
        };
        if let K::Alias(alias) = t.kind() {
            if !alias.is_resolved() {
                if self.in_progress.contains(&t.id()) {
                    return Ok(type_reference_to(name, &t));
                }
                self.resolve_alias(&t)?;
            }
        }
        Ok(t)
    }

    /// Evaluate the expression of a declared alias and install the result as its body. On
    /// failure the alias stays unresolved.
    pub fn resolve_alias(
        &mut self,
        t: &Type,
    ) -> Result<()> {
        let K::Alias(alias) = t.kind() else {
            return Ok(());
        };
        if alias.is_resolved() {
            return Ok(());
        }
        let Some(expr) = alias.expr() else {
            return Err(TypeResolverError::new(format!("Type alias '{}' has no body", alias.name)).into());
        };

        self.in_progress.push(t.id());
        let body = self.resolve_body(&alias.name, expr);
        self.in_progress.pop();
        let body = body?;

        if reaches_unguarded(&body, t, &mut Vec::new()) {
            return Err(
                TypeResolverError::new(format!("Type alias '{}' cannot be resolved to a real type", alias.name)).into(),
            );
        }
        alias.set_body(body);
        tracing::debug!(name = %alias.name, "resolved type alias");
        Ok(())
    }

    /// Alias bodies: a bare hash declares an object type, and an anonymous object or type set
    /// takes the alias name
    fn resolve_body(
        &mut self,
        name: &str,
        expr: &Expr,
    ) -> Result<Type> {
        match expr {
            Expr::Hash(..) => {
                let init = self.resolve(expr)?;
                Ok(object(ObjectType::from_init_hash(Some(name), &init)?))
            }
            Expr::Access { target, params, .. } => self.resolve_access(target, params, Some(name)),
            _ => self.resolve_type_expr(expr),
        }
    }

    fn resolve_access(
        &mut self,
        target: &Expr,
        params: &[Expr],
        name: Option<&str>,
    ) -> Result<Type> {
        let base = self.resolve_type_expr(target)?;
        if let K::TypeSet(set) = base.resolved().kind() {
            if set.is_default() {
                return self.resolve_type_set(params, name);
            }
        }

        let args = params
            .iter()
            .map(|param| self.resolve_rvalue(param))
            .collect::<Result<Vec<_>>>()?;
        let t = access::parameterize(&base, &args)?;
        match (name, t.kind()) {
            (Some(name), K::Object(o)) if o.name.is_none() && !o.is_default() => Ok(object(o.renamed(name))),
            _ => Ok(t),
        }
    }

    /// `TypeSet[{...}]`. Declared types become aliases named `SetName::Type`, evaluated in the
    /// scope of the set once its references are bound.
    fn resolve_type_set(
        &mut self,
        params: &[Expr],
        name: Option<&str>,
    ) -> Result<Type> {
        let [Expr::Hash(entries, _)] = params else {
            return Err(TypeAssertionError::new("", "TypeSet[] expects a single init Hash").into());
        };

        let declared_name = entries.iter().find_map(|(key, value)| match (key, value) {
            (Expr::Identifier(k, _), Expr::Literal(Literal::String(v), _)) if k == KEY_NAME => Some(v.clone()),
            _ => None,
        });
        let set_name = name.map(str::to_string).or(declared_name);

        let mut init = ValueMap::with_capacity(entries.len());
        for (key, value) in entries {
            let key = self.resolve_key(key)?;
            let value = match (key.as_str(), value) {
                (Some(KEY_TYPES), Expr::Hash(types, _)) => {
                    let mut declared = ValueMap::with_capacity(types.len());
                    for (type_key, type_expr) in types {
                        let type_key = self.resolve_key(type_key)?;
                        let qualified = match (&set_name, type_key.as_str()) {
                            (Some(set_name), Some(simple)) => format!("{}::{}", set_name, simple),
                            (None, Some(simple)) => simple.to_string(),
                            (_, None) => {
                                return Err(TypeAssertionError::new(
                                    "initHash['types']",
                                    format!("expects String keys, got {}", type_key.kind_name()),
                                )
                                .into())
                            }
                        };
                        declared.insert(type_key, Value::Type(type_alias(&qualified, type_expr.clone())));
                    }
                    Value::Hash(declared)
                }
                (Some(KEY_REFERENCES), Expr::Hash(references, _)) => {
                    let mut resolved = ValueMap::with_capacity(references.len());
                    for (alias, reference) in references {
                        let alias = self.resolve_key(alias)?;
                        let reference = self.resolve_rvalue(reference)?;
                        resolved.insert(alias, reference);
                    }
                    Value::Hash(resolved)
                }
                _ => self.resolve_rvalue(value)?,
            };
            init.insert(key, value);
        }

        let loader_authority = self.pcore.loader().name_authority().to_string();
        let authority = init
            .get(&Value::from(KEY_NAME_AUTHORITY))
            .and_then(Value::as_str)
            .unwrap_or(&loader_authority)
            .to_string();
        let set = TypeSetType::from_init_hash(set_name.as_deref(), &authority, &Value::Hash(init))?;
        let set_type = type_set(set);
        self.resolve_type_set_members(&set_type)?;
        Ok(set_type)
    }

    /// Bind the references of a type set, make the set and its types loadable under its own
    /// authority, then evaluate the declared types in the scope of the set
    fn resolve_type_set_members(
        &mut self,
        set_type: &Type,
    ) -> Result<()> {
        let K::TypeSet(set) = set_type.kind() else {
            return Ok(());
        };
        let label = set.name.clone().unwrap_or_default();

        for (alias, reference) in &set.references {
            let loader = self.pcore.loader();
            let target = loader
                .load(&TypedName::type_name_in(&reference.name, &reference.name_authority))
                .ok_or_else(|| {
                    TypeResolverError::new(format!(
                        "TypeSet '{}' reference '{}' refers to unknown TypeSet '{}'",
                        label, alias, reference.name
                    ))
                })?;
            self.resolve_alias(&target)?;
            reference.bind(&target)?;
        }

        if let Some(set_name) = &set.name {
            let loader = self.pcore.loader();
            let own = |qname: &str| TypedName::type_name_in(qname, set.name_authority.as_str());
            if loader.load(&own(set_name)).is_none() {
                loader.bind(own(set_name), set_type.clone())?;
            }
            for (simple, t) in &set.types {
                let qualified = format!("{}::{}", set_name, simple);
                if loader.load(&own(&qualified)).is_none() {
                    loader.bind(own(&qualified), t.clone())?;
                }
            }
        }

        let pcore = self.pcore;
        pcore.with_type_set_scope(set_type, || {
            for t in set.types.values() {
                self.resolve_alias(t)?;
            }
            Ok::<(), crate::error::PcoreError>(())
        })?;
        tracing::debug!(type_set = %label, types = set.types.len(), "resolved type set");
        Ok(())
    }
}

/// Whether `t` leads back to `target` through aliases, references and the members of variant,
/// optional and not-undef types, without passing a type that constrains structure
fn reaches_unguarded(
    t: &Type,
    target: &Type,
    seen: &mut Vec<usize>,
) -> bool {
    if t.ptr_eq(target) {
        return true;
    }
    if seen.contains(&t.id()) {
        return false;
    }
    seen.push(t.id());
    match t.kind() {
        K::Alias(alias) => alias.body().is_some_and(|body| reaches_unguarded(body, target, seen)),
        K::Reference(reference) => reference
            .target()
            .is_some_and(|next| reaches_unguarded(&next, target, seen)),
        K::Variant(members) => members.iter().any(|m| reaches_unguarded(m, target, seen)),
        K::Optional(inner) | K::NotUndef(inner) => reaches_unguarded(inner, target, seen),
        _ => false,
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Undef => Value::Undef,
        Literal::Default => Value::Default,
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Integer(n) => Value::Integer(*n),
        Literal::Float(x) => Value::Float(*x),
        Literal::String(s) => Value::String(s.clone()),
    }
}

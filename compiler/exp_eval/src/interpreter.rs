//! Tree-walking interpreter over IR.
//!
//! One [`Frame`] per method call holds the receiver, the arguments and the
//! method's locals, indexed by their IR ids. Static fields live on the
//! interpreter and are initialized on first use.

use std::cell::RefCell;
use std::rc::Rc;

use exp_ir::node::{Expr, ExprKind, Literal, Stmt, StmtKind};
use exp_ir::{
    ensure_sufficient_stack, BinaryOp, ClassId, FieldId, InternalError, IrMethod, IrModule,
    LocalId, Member, MethodId, Modifiers, ParamId, PostfixOp, PrefixOp, TypeId,
};
use rustc_hash::FxHashMap;

use crate::operators::step;
use crate::{evaluate_binary, evaluate_prefix, EvalError, EvalResult, Object, Value};

/// Entry point names generated for top-level code.
const MAIN_CLASS: &str = "Main";
const MAIN_METHOD: &str = "main";

const DEFAULT_MAX_DEPTH: usize = 1000;

/// Outcome of running a statement.
enum Flow {
    Normal,
    Return(Value),
}

struct Frame {
    this: Option<Rc<Object>>,
    args: Vec<Value>,
    locals: Vec<Value>,
}

impl Frame {
    /// A frame with no arguments or locals, for field initializers and
    /// default values.
    fn detached(this: Option<Rc<Object>>) -> Self {
        Frame {
            this,
            args: Vec::new(),
            locals: Vec::new(),
        }
    }
}

/// A storage location an assignment writes to.
enum Place {
    Local(LocalId),
    Argument(ParamId),
    Field {
        object: Option<Rc<Object>>,
        field: FieldId,
    },
    Element {
        items: Rc<RefCell<Vec<Value>>>,
        index: usize,
    },
}

pub struct Interpreter<'ir> {
    module: &'ir IrModule,
    statics: FxHashMap<FieldId, Value>,
    depth: usize,
    max_depth: usize,
}

impl<'ir> Interpreter<'ir> {
    pub fn new(module: &'ir IrModule) -> Self {
        Interpreter {
            module,
            statics: FxHashMap::default(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit on nested method calls before [`EvalError::CallDepthExceeded`].
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Call `Main.main(argv)`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run_main(&mut self, argv: &[&str]) -> EvalResult {
        let main = self
            .module
            .class_by_name(MAIN_CLASS)
            .and_then(|class| self.module.class(class).method_named(MAIN_METHOD))
            .ok_or_else(|| EvalError::NoEntryPoint {
                class: MAIN_CLASS.to_string(),
                method: MAIN_METHOD.to_string(),
            })?;
        let argv = Value::array(argv.iter().map(|arg| Value::string(arg)).collect());
        self.call(main, None, vec![argv])
    }

    /// Call `method` on `this` (ignored for static methods). Missing
    /// trailing arguments take their declared defaults.
    pub fn call(
        &mut self,
        method: MethodId,
        this: Option<Rc<Object>>,
        args: Vec<Value>,
    ) -> EvalResult {
        let module = self.module;
        let data = module.method(method);
        if self.depth >= self.max_depth {
            return Err(EvalError::CallDepthExceeded(self.max_depth));
        }
        self.check_bound(data)?;
        let body = data
            .body
            .as_ref()
            .ok_or_else(|| InternalError::MissingBody(data.name.clone()))?;
        tracing::trace!(name = %data.name, depth = self.depth, "call");

        let this = if data.is_static() { None } else { this };
        let args = self.bind_args(data, this.as_ref(), args)?;
        let locals = data
            .locals
            .iter()
            .map(|local| self.default_value(local.ty))
            .collect();
        let mut frame = Frame { this, args, locals };

        self.depth = self.depth.saturating_add(1);
        let flow = ensure_sufficient_stack(|| self.exec(body, &mut frame));
        self.depth = self.depth.saturating_sub(1);
        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Void),
        }
    }

    /// Create an instance of `class` with every instance field initialized.
    pub fn instantiate(&mut self, class: ClassId) -> EvalResult<Rc<Object>> {
        let module = self.module;
        let object = Rc::new(Object::new(class));
        for &field in &module.class(class).fields {
            let data = module.field(field);
            if data.modifiers.contains(Modifiers::STATIC) {
                continue;
            }
            let value = match &data.init {
                Some(init) => self.eval(init, &mut Frame::detached(Some(Rc::clone(&object))))?,
                None => self.default_value(data.ty),
            };
            object.set(field, value);
        }
        Ok(object)
    }

    /// Holders must all be bound by the time anything executes.
    fn check_bound(&self, method: &IrMethod) -> Result<(), InternalError> {
        let types = &self.module.types;
        if types.is_unbound(method.ret) {
            return Err(InternalError::UnboundHolder {
                context: format!("return type of `{}`", method.name),
            });
        }
        if let Some(local) = method.locals.iter().find(|l| types.is_unbound(l.ty)) {
            return Err(InternalError::UnboundHolder {
                context: format!("local `{}` of `{}`", local.name, method.name),
            });
        }
        Ok(())
    }

    fn bind_args(
        &mut self,
        method: &IrMethod,
        this: Option<&Rc<Object>>,
        mut args: Vec<Value>,
    ) -> EvalResult<Vec<Value>> {
        let wrong_count = |found| EvalError::WrongArgCount {
            name: method.name.clone(),
            expected: method.params.len(),
            found,
        };
        if args.len() > method.params.len() {
            return Err(wrong_count(args.len()));
        }
        let supplied = args.len();
        for param in &method.params[supplied..] {
            let Some(default) = &param.default else {
                return Err(wrong_count(supplied));
            };
            let value = self.eval(default, &mut Frame::detached(this.cloned()))?;
            args.push(value);
        }
        Ok(args)
    }

    /// Initial value of storage of type `ty`.
    fn default_value(&self, ty: TypeId) -> Value {
        match self.module.types.resolve(ty) {
            TypeId::INT | TypeId::LONG => Value::Int(0),
            TypeId::FLOAT | TypeId::DOUBLE => Value::Float(0.0),
            TypeId::BOOL => Value::Bool(false),
            _ => Value::Null,
        }
    }

    fn exec(&mut self, stmt: &Stmt, frame: &mut Frame) -> EvalResult<Flow> {
        match &stmt.kind {
            StmtKind::Statements(stms) => {
                for stmt in stms {
                    if let Flow::Return(value) = self.exec(stmt, frame)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::Expression(expr) => {
                self.eval(expr, frame)?;
                Ok(Flow::Normal)
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_bool(cond, frame)? {
                    self.exec(then_branch, frame)
                } else if let Some(branch) = else_branch {
                    self.exec(branch, frame)
                } else {
                    Ok(Flow::Normal)
                }
            }
            StmtKind::While { cond, body } => {
                while self.eval_bool(cond, frame)? {
                    if let Flow::Return(value) = self.exec(body, frame)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::FastFor {
                local,
                min,
                max,
                body,
            } => self.run_loop(*local, (*min..*max).map(Value::Int), body, frame),
            StmtKind::Fast2For {
                local,
                min,
                max,
                body,
            } => {
                let min = self.eval_int(min, frame)?;
                let max = self.eval_int(max, frame)?;
                self.run_loop(*local, (min..max).map(Value::Int), body, frame)
            }
            StmtKind::For {
                local,
                iterable,
                body,
            } => match self.eval(iterable, frame)? {
                Value::Range { min, max } => {
                    self.run_loop(*local, (min..max).map(Value::Int), body, frame)
                }
                Value::Array(items) => {
                    let items = items.borrow().clone();
                    self.run_loop(*local, items.into_iter(), body, frame)
                }
                Value::Str(text) => {
                    let chars = text
                        .chars()
                        .map(|c| Value::string(c.encode_utf8(&mut [0; 4])))
                        .collect::<Vec<_>>();
                    self.run_loop(*local, chars.into_iter(), body, frame)
                }
                other => Err(EvalError::NotIterable(other.type_name())),
            },
            StmtKind::Return(value) => {
                let value = match value {
                    Some(value) => self.eval(value, frame)?,
                    None => Value::Void,
                };
                Ok(Flow::Return(value))
            }
        }
    }

    fn run_loop(
        &mut self,
        local: LocalId,
        values: impl Iterator<Item = Value>,
        body: &Stmt,
        frame: &mut Frame,
    ) -> EvalResult<Flow> {
        for value in values {
            frame.locals[local.index()] = value;
            if let Flow::Return(value) = self.exec(body, frame)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn eval(&mut self, expr: &Expr, frame: &mut Frame) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(expr, frame))
    }

    fn eval_inner(&mut self, expr: &Expr, frame: &mut Frame) -> EvalResult {
        match &expr.kind {
            ExprKind::Immediate(literal) => Ok(match *literal {
                Literal::Int(n) => Value::Int(n),
                Literal::Float(x) => Value::Float(x),
                Literal::Bool(b) => Value::Bool(b),
            }),
            ExprKind::Local(local) => Ok(frame.locals[local.index()].clone()),
            ExprKind::Argument(param) => Ok(frame.args[param.index()].clone()),
            ExprKind::Member(member) => {
                let this = frame.this.clone();
                self.read_member(this, *member)
            }
            ExprKind::MemberAccess { target, member } => {
                let object = self.eval_object(target, frame, *member)?;
                self.read_member(object, *member)
            }
            ExprKind::This => frame
                .this
                .clone()
                .map(Value::Object)
                .ok_or_else(|| EvalError::NullReference("this".to_string())),
            ExprKind::Class(class) => Err(EvalError::ClassAsValue(
                self.module.class(*class).name.clone(),
            )),
            ExprKind::ArrayAccess { .. } => {
                let place = self.place(expr, frame)?;
                self.read(&place, frame)
            }
            ExprKind::Call { callee, args } => {
                let callee = self.eval(callee, frame)?;
                let args = self.eval_args(args, frame)?;
                match callee {
                    Value::Method { method, receiver } => self.call(method, receiver, args),
                    other => Err(EvalError::NotCallable(other.type_name())),
                }
            }
            ExprKind::New { class, args } => {
                // Constructors take no parameters; arguments only run for effect.
                self.eval_args(args, frame)?;
                Ok(Value::Object(self.instantiate(*class)?))
            }
            ExprKind::UnopPre { op, operand } => match op {
                PrefixOp::Inc | PrefixOp::Dec => {
                    let place = self.place(operand, frame)?;
                    let value = evaluate_prefix(*op, &self.read(&place, frame)?)?;
                    self.write(&place, value.clone(), frame)?;
                    Ok(value)
                }
                _ => {
                    let value = self.eval(operand, frame)?;
                    evaluate_prefix(*op, &value)
                }
            },
            ExprKind::UnopPost { op, operand } => {
                let place = self.place(operand, frame)?;
                let old = self.read(&place, frame)?;
                let delta = match op {
                    PostfixOp::Inc => 1,
                    PostfixOp::Dec => -1,
                };
                self.write(&place, step(&old, delta)?, frame)?;
                Ok(old)
            }
            ExprKind::BinOp { op, left, right } => self.binary(*op, left, right, frame),
            ExprKind::Unknown(name) => Err(EvalError::Unresolved(name.clone())),
        }
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, frame: &mut Frame) -> EvalResult {
        match op {
            BinaryOp::And => {
                Ok(Value::Bool(self.eval_bool(left, frame)? && self.eval_bool(right, frame)?))
            }
            BinaryOp::Or => {
                Ok(Value::Bool(self.eval_bool(left, frame)? || self.eval_bool(right, frame)?))
            }
            BinaryOp::Assign => {
                let place = self.place(left, frame)?;
                let value = self.eval(right, frame)?;
                self.write(&place, value.clone(), frame)?;
                Ok(value)
            }
            op if op.is_assignment() => {
                let place = self.place(left, frame)?;
                let old = self.read(&place, frame)?;
                let rhs = self.eval(right, frame)?;
                let value = evaluate_binary(op, &old, &rhs)?;
                self.write(&place, value.clone(), frame)?;
                Ok(value)
            }
            op => {
                let left = self.eval(left, frame)?;
                let right = self.eval(right, frame)?;
                evaluate_binary(op, &left, &right)
            }
        }
    }

    fn eval_args(&mut self, args: &[Expr], frame: &mut Frame) -> EvalResult<Vec<Value>> {
        args.iter().map(|arg| self.eval(arg, frame)).collect()
    }

    fn eval_bool(&mut self, expr: &Expr, frame: &mut Frame) -> EvalResult<bool> {
        match self.eval(expr, frame)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::TypeMismatch {
                expected: "Bool",
                found: other.type_name(),
            }),
        }
    }

    fn eval_int(&mut self, expr: &Expr, frame: &mut Frame) -> EvalResult<i64> {
        match self.eval(expr, frame)? {
            Value::Int(n) => Ok(n),
            other => Err(EvalError::TypeMismatch {
                expected: "Int",
                found: other.type_name(),
            }),
        }
    }

    /// Receiver of `target.member`. Static members need no receiver.
    fn eval_object(
        &mut self,
        target: &Expr,
        frame: &mut Frame,
        member: Member,
    ) -> EvalResult<Option<Rc<Object>>> {
        if matches!(target.kind, ExprKind::Class(_)) && self.is_static(member) {
            return Ok(None);
        }
        match self.eval(target, frame)? {
            Value::Object(object) => Ok(Some(object)),
            _ if self.is_static(member) => Ok(None),
            Value::Null => Err(EvalError::NullReference(
                self.module.member_name(member).to_string(),
            )),
            other => Err(EvalError::TypeMismatch {
                expected: "object",
                found: other.type_name(),
            }),
        }
    }

    fn is_static(&self, member: Member) -> bool {
        match member {
            Member::Field(field) => self
                .module
                .field(field)
                .modifiers
                .contains(Modifiers::STATIC),
            Member::Method(method) => self.module.method(method).is_static(),
        }
    }

    fn read_member(&mut self, object: Option<Rc<Object>>, member: Member) -> EvalResult {
        match member {
            Member::Field(field) => self.read_field(object.as_ref(), field),
            Member::Method(method) => {
                let receiver = if self.module.method(method).is_static() {
                    None
                } else {
                    object
                };
                Ok(Value::Method { method, receiver })
            }
        }
    }

    fn read_field(&mut self, object: Option<&Rc<Object>>, field: FieldId) -> EvalResult {
        let module = self.module;
        let data = module.field(field);
        if data.modifiers.contains(Modifiers::STATIC) {
            if let Some(value) = self.statics.get(&field) {
                return Ok(value.clone());
            }
            let value = match &data.init {
                Some(init) => self.eval(init, &mut Frame::detached(None))?,
                None => self.default_value(data.ty),
            };
            self.statics.insert(field, value.clone());
            return Ok(value);
        }
        object
            .and_then(|object| object.get(field))
            .ok_or_else(|| EvalError::NullReference(data.name.clone()))
    }

    /// Resolve an assignable expression to its storage location.
    fn place(&mut self, expr: &Expr, frame: &mut Frame) -> EvalResult<Place> {
        match &expr.kind {
            ExprKind::Local(local) => Ok(Place::Local(*local)),
            ExprKind::Argument(param) => Ok(Place::Argument(*param)),
            ExprKind::Member(Member::Field(field)) => Ok(Place::Field {
                object: frame.this.clone(),
                field: *field,
            }),
            ExprKind::MemberAccess {
                target,
                member: member @ Member::Field(field),
            } => Ok(Place::Field {
                object: self.eval_object(target, frame, *member)?,
                field: *field,
            }),
            ExprKind::ArrayAccess { target, index } => {
                let items = match self.eval(target, frame)? {
                    Value::Array(items) => items,
                    other => {
                        return Err(EvalError::TypeMismatch {
                            expected: "array",
                            found: other.type_name(),
                        })
                    }
                };
                let raw = self.eval_int(index, frame)?;
                let len = items.borrow().len();
                match usize::try_from(raw) {
                    Ok(index) if index < len => Ok(Place::Element { items, index }),
                    _ => Err(EvalError::IndexOutOfBounds { index: raw, len }),
                }
            }
            ExprKind::Unknown(name) => Err(EvalError::Unresolved(name.clone())),
            _ => Err(EvalError::InvalidAssignmentTarget),
        }
    }

    fn read(&mut self, place: &Place, frame: &Frame) -> EvalResult {
        match place {
            Place::Local(local) => Ok(frame.locals[local.index()].clone()),
            Place::Argument(param) => Ok(frame.args[param.index()].clone()),
            Place::Field { object, field } => self.read_field(object.as_ref(), *field),
            Place::Element { items, index } => Ok(items.borrow()[*index].clone()),
        }
    }

    fn write(&mut self, place: &Place, value: Value, frame: &mut Frame) -> EvalResult<()> {
        match place {
            Place::Local(local) => frame.locals[local.index()] = value,
            Place::Argument(param) => frame.args[param.index()] = value,
            Place::Field { object, field } => {
                if self.is_static(Member::Field(*field)) {
                    self.statics.insert(*field, value);
                } else {
                    let object = object.as_ref().ok_or_else(|| {
                        EvalError::NullReference(self.module.field(*field).name.clone())
                    })?;
                    object.set(*field, value);
                }
            }
            Place::Element { items, index } => items.borrow_mut()[*index] = value,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;

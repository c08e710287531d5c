// ABOUTME: The trampoline evaluator: an explicit heap-frame stack standing in for native recursion.

use crate::error::ErrorKind;
use crate::interpreter::Interpreter;
use crate::value::Atom;

/// One heap-allocated stand-in for a native call frame. Encoded as a small
/// fixed-layout enum rather than a six-slot list-encoded frame -- same
/// semantics, no list traversal needed to read a slot.
#[derive(Debug)]
pub(crate) enum Frame {
    /// Evaluating the test of an `IF`; `then`/`else` are still raw exprs.
    If {
        env: Atom,
        then_branch: Atom,
        else_branch: Atom,
    },
    /// Evaluating the value expression of a plain `(DEFINE name expr)`.
    Define { env: Atom, name: Atom },
    /// `APPLY` stage 1: waiting for the function expression's value.
    ApplyFn { env: Atom, args_expr: Atom },
    /// `APPLY` stage 2: waiting for the argument-list expression's value.
    ApplyArgs { env: Atom, function: Atom },
    /// Evaluating operator and operands of a general application.
    Application {
        env: Atom,
        evaluated_op: Option<Atom>,
        arg_exprs: Vec<Atom>,
        next_arg: usize,
        evaluated_args: Vec<Atom>,
    },
    /// Running a closure body; `forms` holds everything not yet executed.
    Exec { env: Atom, forms: Vec<Atom> },
    /// A macro's expansion must be re-evaluated in the *caller's*
    /// environment once the macro body finishes producing it.
    MacroReturn { caller_env: Atom },
}

impl Frame {
    /// Atoms this frame holds live, for the collector to walk.
    fn roots(&self, out: &mut Vec<Atom>) {
        match self {
            Frame::If {
                env,
                then_branch,
                else_branch,
            } => {
                out.push(*env);
                out.push(*then_branch);
                out.push(*else_branch);
            }
            Frame::Define { env, name } => {
                out.push(*env);
                out.push(*name);
            }
            Frame::ApplyFn { env, args_expr } => {
                out.push(*env);
                out.push(*args_expr);
            }
            Frame::ApplyArgs { env, function } => {
                out.push(*env);
                out.push(*function);
            }
            Frame::Application {
                env,
                evaluated_op,
                arg_exprs,
                evaluated_args,
                ..
            } => {
                out.push(*env);
                if let Some(op) = evaluated_op {
                    out.push(*op);
                }
                out.extend(arg_exprs);
                out.extend(evaluated_args);
            }
            Frame::Exec { env, forms } => {
                out.push(*env);
                out.extend(forms);
            }
            Frame::MacroReturn { caller_env } => out.push(*caller_env),
        }
    }
}

/// Transition produced by one trampoline step.
enum Step {
    Eval(Atom, Atom),
    Return(Atom),
    Done(Atom),
}

impl Interpreter {
    pub(crate) fn eval_stack_roots(&self) -> Vec<Atom> {
        let mut out = Vec::new();
        for frame in &self.eval_stack {
            frame.roots(&mut out);
        }
        out
    }

    /// Runs the evaluator to completion. An evaluation runs synchronously;
    /// there is no suspension point exposed to callers.
    pub fn eval_expr(&mut self, expr: Atom, env: Atom) -> Result<Atom, ErrorKind> {
        let saved_depth = self.eval_stack.len();
        let result = self.run_trampoline(expr, env);
        self.eval_stack.truncate(saved_depth);
        result
    }

    fn run_trampoline(&mut self, expr: Atom, env: Atom) -> Result<Atom, ErrorKind> {
        let mut state = Step::Eval(expr, env);
        loop {
            let roots = state_roots(&state);
            self.maybe_collect(&roots);
            state = match state {
                Step::Eval(expr, env) => self.step_eval(expr, env)?,
                Step::Return(value) => self.step_return(value)?,
                Step::Done(value) => return Ok(value),
            };
        }
    }

    fn maybe_collect(&mut self, extra_roots: &[Atom]) {
        self.iterations += 1;
        if self.iterations >= self.config.gc_trigger_interval {
            self.iterations = 0;
            self.collect_garbage(extra_roots);
        }
    }

    /// Step 1/2: self-evaluation or compound-expression dispatch.
    fn step_eval(&mut self, expr: Atom, env: Atom) -> Result<Step, ErrorKind> {
        match expr {
            Atom::Symbol(s) => {
                let value = self.env_get(env, s)?;
                Ok(Step::Return(value))
            }
            Atom::Pair(id) => {
                let cell = self.pairs.get(id);
                self.eval_compound(cell.head, cell.tail, env)
            }
            literal => Ok(Step::Return(literal)),
        }
    }

    fn eval_compound(&mut self, op: Atom, args: Atom, env: Atom) -> Result<Step, ErrorKind> {
        if let Atom::Symbol(s) = op {
            if s == self.sym_quote {
                let (first, rest) = self.uncons("QUOTE", args)?;
                self.expect_nil("QUOTE", rest, ARITY_ONE)?;
                return Ok(Step::Return(first));
            }
            if s == self.sym_if {
                let (test, rest) = self.uncons("IF", args)?;
                let (then_branch, rest) = self.uncons("IF", rest)?;
                let (else_branch, rest) = self.uncons("IF", rest)?;
                self.expect_nil("IF", rest, ARITY_THREE)?;
                self.eval_stack.push(Frame::If {
                    env,
                    then_branch,
                    else_branch,
                });
                return Ok(Step::Eval(test, env));
            }
            if s == self.sym_define {
                return self.eval_define(args, env);
            }
            if s == self.sym_lambda {
                let (formals, body) = self.uncons("LAMBDA", args)?;
                self.validate_formals(formals)?;
                let closure = self.build_closure(env, formals, body);
                return Ok(Step::Return(closure));
            }
            if s == self.sym_defmacro {
                return self.eval_defmacro(args, env);
            }
            if s == self.sym_apply {
                let (fn_expr, rest) = self.uncons("APPLY", args)?;
                let (args_expr, rest) = self.uncons("APPLY", rest)?;
                self.expect_nil("APPLY", rest, ARITY_TWO)?;
                self.eval_stack.push(Frame::ApplyFn { env, args_expr });
                return Ok(Step::Eval(fn_expr, env));
            }
        }
        // General application: evaluate the operator first.
        let arg_exprs = self
            .list_to_vec(args)
            .map_err(|_| ErrorKind::wrong_type("apply", "proper list", "improper list"))?;
        self.eval_stack.push(Frame::Application {
            env,
            evaluated_op: None,
            arg_exprs,
            next_arg: 0,
            evaluated_args: Vec::new(),
        });
        Ok(Step::Eval(op, env))
    }

    fn eval_define(&mut self, args: Atom, env: Atom) -> Result<Step, ErrorKind> {
        let (target, rest) = self.uncons("DEFINE", args)?;
        match target {
            Atom::Symbol(_) => {
                let (value_expr, rest) = self.uncons("DEFINE", rest)?;
                self.expect_nil("DEFINE", rest, ARITY_TWO)?;
                self.eval_stack.push(Frame::Define { env, name: target });
                Ok(Step::Eval(value_expr, env))
            }
            Atom::Pair(id) => {
                // Shorthand: (DEFINE (name . formals) . body)
                let cell = self.pairs.get(id);
                let name = cell.head;
                let formals = cell.tail;
                self.validate_formals(formals)?;
                let closure = self.build_closure(env, formals, rest);
                if let Atom::Symbol(sym) = name {
                    self.env_set(env, sym, closure)?;
                    Ok(Step::Return(name))
                } else {
                    Err(ErrorKind::Syntax(
                        "DEFINE shorthand name must be a symbol".to_string(),
                    ))
                }
            }
            other => Err(ErrorKind::wrong_type(
                "DEFINE",
                "symbol or (name . formals)",
                other.type_name(),
            )),
        }
    }

    fn eval_defmacro(&mut self, args: Atom, env: Atom) -> Result<Step, ErrorKind> {
        let (target, body) = self.uncons("DEFMACRO", args)?;
        let (name, formals) = match target {
            Atom::Pair(id) => {
                let cell = self.pairs.get(id);
                (cell.head, cell.tail)
            }
            other => {
                return Err(ErrorKind::wrong_type(
                    "DEFMACRO",
                    "(name . formals)",
                    other.type_name(),
                ))
            }
        };
        self.validate_formals(formals)?;
        let sym = match name {
            Atom::Symbol(s) => s,
            other => return Err(ErrorKind::wrong_type("DEFMACRO", "symbol", other.type_name())),
        };
        let closure_cell = match self.build_closure(env, formals, body) {
            Atom::Closure(id) => id,
            _ => unreachable!("build_closure always returns a Closure atom"),
        };
        let macro_atom = Atom::Macro(closure_cell);
        self.env_set(env, sym, macro_atom)?;
        Ok(Step::Return(name))
    }

    /// Steps 3/6/7: resume whatever frame is on top of the stack.
    fn step_return(&mut self, value: Atom) -> Result<Step, ErrorKind> {
        let frame = match self.eval_stack.pop() {
            Some(frame) => frame,
            None => return Ok(Step::Done(value)),
        };
        match frame {
            Frame::If {
                env,
                then_branch,
                else_branch,
            } => {
                let branch = if value.is_truthy() { then_branch } else { else_branch };
                Ok(Step::Eval(branch, env))
            }
            Frame::Define { env, name } => {
                if let Atom::Symbol(sym) = name {
                    self.env_set(env, sym, value)?;
                }
                Ok(Step::Return(name))
            }
            Frame::ApplyFn { env, args_expr } => {
                self.eval_stack.push(Frame::ApplyArgs { env, function: value });
                Ok(Step::Eval(args_expr, env))
            }
            Frame::ApplyArgs { env, function } => {
                let arg_exprs = self
                    .list_to_vec(value)
                    .map_err(|_| ErrorKind::wrong_type("APPLY", "proper list", "improper list"))?;
                self.eval_stack.push(Frame::Application {
                    env,
                    evaluated_op: Some(function),
                    arg_exprs,
                    next_arg: 0,
                    evaluated_args: Vec::new(),
                });
                self.advance_application()
            }
            Frame::Application {
                env,
                evaluated_op,
                arg_exprs,
                next_arg,
                mut evaluated_args,
            } => {
                if evaluated_op.is_none() {
                    if let Atom::Macro(cell) = value {
                        // Arguments are passed unevaluated: bind the raw
                        // expressions directly and re-evaluate the
                        // expansion in the caller's environment.
                        return self.expand_macro(cell, arg_exprs, env);
                    }
                    self.eval_stack.push(Frame::Application {
                        env,
                        evaluated_op: Some(value),
                        arg_exprs,
                        next_arg,
                        evaluated_args,
                    });
                    return self.advance_application();
                }
                evaluated_args.push(value);
                self.eval_stack.push(Frame::Application {
                    env,
                    evaluated_op,
                    arg_exprs,
                    next_arg,
                    evaluated_args,
                });
                self.advance_application()
            }
            Frame::Exec { env, forms } => self.advance_exec(env, forms),
            Frame::MacroReturn { caller_env } => Ok(Step::Eval(value, caller_env)),
        }
    }

    /// Drives the argument-evaluation loop of an `Application` frame:
    /// evaluates the next pending argument, or finalizes and applies once
    /// every argument (and the operator) is known.
    fn advance_application(&mut self) -> Result<Step, ErrorKind> {
        let frame = self.eval_stack.pop().expect("advance_application needs a frame");
        let Frame::Application {
            env,
            evaluated_op,
            arg_exprs,
            next_arg,
            evaluated_args,
        } = frame
        else {
            unreachable!("advance_application called on the wrong frame kind");
        };

        if next_arg < arg_exprs.len() {
            let expr = arg_exprs[next_arg];
            self.eval_stack.push(Frame::Application {
                env,
                evaluated_op,
                arg_exprs,
                next_arg: next_arg + 1,
                evaluated_args,
            });
            return Ok(Step::Eval(expr, env));
        }

        let operator = evaluated_op.expect("operator must be known before applying");
        self.apply(operator, &evaluated_args)
    }

    /// Step 4 (APPLY step): dispatch on the operator's tag.
    fn apply(&mut self, operator: Atom, args: &[Atom]) -> Result<Step, ErrorKind> {
        match operator {
            Atom::Builtin(f) => Ok(Step::Return(f(self, args)?)),
            Atom::Closure(cell) => self.bind_and_exec(cell, args),
            other => Err(ErrorKind::wrong_type(
                "apply",
                "built-in or closure",
                other.type_name(),
            )),
        }
    }

    /// Step 5 (BIND step): lockstep-bind formals against evaluated args in a
    /// fresh child of the closure's captured environment.
    fn bind_and_exec(
        &mut self,
        cell: crate::value::PairId,
        args: &[Atom],
    ) -> Result<Step, ErrorKind> {
        let closure = self.pairs.get(cell);
        let captured_env = closure.head;
        let inner = match closure.tail {
            Atom::Pair(id) => self.pairs.get(id),
            _ => unreachable!("closure cell always carries (formals . body)"),
        };
        let formals = inner.head;
        let body = inner.tail;

        let new_env = self.env_new(captured_env);
        self.bind_formals(new_env, formals, args)?;

        let forms = self
            .list_to_vec(body)
            .map_err(|_| ErrorKind::wrong_type("apply", "proper list body", "improper list"))?;
        self.advance_exec(new_env, forms)
    }

    fn bind_formals(&mut self, env: Atom, formals: Atom, args: &[Atom]) -> Result<(), ErrorKind> {
        let mut formals = formals;
        let mut idx = 0;
        loop {
            match formals {
                Atom::Nil => {
                    if idx != args.len() {
                        return Err(ErrorKind::arguments("apply", format!("{idx}"), args.len()));
                    }
                    return Ok(());
                }
                Atom::Symbol(rest_sym) => {
                    let rest_list = self.vec_to_list(&args[idx..]);
                    self.env_set(env, rest_sym, rest_list)?;
                    return Ok(());
                }
                Atom::Pair(id) => {
                    if idx >= args.len() {
                        return Err(ErrorKind::arguments(
                            "apply",
                            format!("at least {}", idx + 1),
                            args.len(),
                        ));
                    }
                    let cell = self.pairs.get(id);
                    let sym = match cell.head {
                        Atom::Symbol(s) => s,
                        other => {
                            return Err(ErrorKind::wrong_type(
                                "apply",
                                "symbol formal",
                                other.type_name(),
                            ))
                        }
                    };
                    self.env_set(env, sym, args[idx])?;
                    idx += 1;
                    formals = cell.tail;
                }
                other => {
                    return Err(ErrorKind::wrong_type(
                        "apply",
                        "formal parameter list",
                        other.type_name(),
                    ))
                }
            }
        }
    }

    /// Step 6 (EXEC step): evaluate body forms left to right. The last form
    /// is evaluated without pushing a new frame, which is what gives the
    /// trampoline its tail-call handling -- the native stack never grows
    /// with the number of body forms or nested tail calls.
    fn advance_exec(&mut self, env: Atom, mut forms: Vec<Atom>) -> Result<Step, ErrorKind> {
        if forms.is_empty() {
            return Ok(Step::Return(Atom::Nil));
        }
        let form = forms.remove(0);
        if forms.is_empty() {
            Ok(Step::Eval(form, env))
        } else {
            self.eval_stack.push(Frame::Exec { env, forms });
            Ok(Step::Eval(form, env))
        }
    }

    fn expand_macro(
        &mut self,
        cell: crate::value::PairId,
        raw_args: Vec<Atom>,
        caller_env: Atom,
    ) -> Result<Step, ErrorKind> {
        let closure = self.pairs.get(cell);
        let captured_env = closure.head;
        let inner = match closure.tail {
            Atom::Pair(id) => self.pairs.get(id),
            _ => unreachable!("macro cell always carries (formals . body)"),
        };
        let formals = inner.head;
        let body = inner.tail;

        let new_env = self.env_new(captured_env);
        self.bind_formals(new_env, formals, &raw_args)?;
        self.eval_stack.push(Frame::MacroReturn { caller_env });

        let forms = self
            .list_to_vec(body)
            .map_err(|_| ErrorKind::wrong_type("defmacro", "proper list body", "improper list"))?;
        self.advance_exec(new_env, forms)
    }

    fn build_closure(&mut self, env: Atom, formals: Atom, body: Atom) -> Atom {
        let inner = self.pairs.alloc(formals, body);
        let outer = self.pairs.alloc(env, Atom::Pair(inner));
        Atom::Closure(outer)
    }

    /// Formals must be Nil, a bare symbol, or a (possibly dotted) list of
    /// symbols.
    fn validate_formals(&self, formals: Atom) -> Result<(), ErrorKind> {
        let mut cur = formals;
        loop {
            match cur {
                Atom::Nil | Atom::Symbol(_) => return Ok(()),
                Atom::Pair(id) => {
                    let cell = self.pairs.get(id);
                    if !matches!(cell.head, Atom::Symbol(_)) {
                        return Err(ErrorKind::Syntax(
                            "closure formals must be symbols".to_string(),
                        ));
                    }
                    cur = cell.tail;
                }
                _ => {
                    return Err(ErrorKind::Syntax(
                        "closure formals must be Nil, a symbol, or a list of symbols".to_string(),
                    ))
                }
            }
        }
    }

    fn uncons(&self, who: &str, list: Atom) -> Result<(Atom, Atom), ErrorKind> {
        match list {
            Atom::Pair(id) => {
                let cell = self.pairs.get(id);
                Ok((cell.head, cell.tail))
            }
            _ => Err(ErrorKind::arguments(who, ARITY_AT_LEAST_ONE, 0)),
        }
    }

    fn expect_nil(&self, who: &str, rest: Atom, expected: &str) -> Result<(), ErrorKind> {
        if rest.is_nil() {
            Ok(())
        } else {
            let actual = self.list_to_vec(rest).map(|v| v.len() + 1).unwrap_or(usize::MAX);
            Err(ErrorKind::arguments(who, expected.to_string(), actual))
        }
    }

    /// Converts a proper list atom into a plain `Vec<Atom>`. Errors if the
    /// list is improper (dotted, non-Nil tail).
    pub(crate) fn list_to_vec(&self, list: Atom) -> Result<Vec<Atom>, ()> {
        let mut out = Vec::new();
        let mut cur = list;
        loop {
            match cur {
                Atom::Nil => return Ok(out),
                Atom::Pair(id) => {
                    let cell = self.pairs.get(id);
                    out.push(cell.head);
                    cur = cell.tail;
                }
                _ => return Err(()),
            }
        }
    }

    /// Builds a proper list atom from a slice, right to left.
    pub(crate) fn vec_to_list(&mut self, items: &[Atom]) -> Atom {
        let mut list = Atom::Nil;
        for item in items.iter().rev() {
            list = Atom::Pair(self.pairs.alloc(*item, list));
        }
        list
    }
}

const ARITY_ONE: &str = crate::error::ARITY_ONE;
const ARITY_TWO: &str = crate::error::ARITY_TWO;
const ARITY_THREE: &str = crate::error::ARITY_THREE;
const ARITY_AT_LEAST_ONE: &str = crate::error::ARITY_AT_LEAST_ONE;

fn state_roots(state: &Step) -> Vec<Atom> {
    match state {
        Step::Eval(expr, env) => vec![*expr, *env],
        Step::Return(value) => vec![*value],
        Step::Done(value) => vec![*value],
    }
}

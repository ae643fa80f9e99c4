use std::collections::HashMap;

use wasm_encoder::{
    CodeSection, EntityType, ExportKind, ExportSection, Function, FunctionSection, ImportSection,
    Instruction, Module, TypeSection, ValType,
};

use crate::{
    error::{CResult, CodegenError},
    syntax::{Expression, FnDecl, Item, Operator, Type},
};

/// Module that extern declarations are imported from.
pub(crate) const IMPORT_MODULE: &str = "env";

type FunctionIndex = u32;
type LocalIndex = u32;

struct Signature {
    index: FunctionIndex,
    arity: usize,
    returns: bool,
}

/// Lowers parsed items to a WebAssembly module. Every non-void value is an
/// `f64`.
pub(crate) struct Compiler<'a, 'src> {
    items: &'a [Item<'src>],
    functions: HashMap<&'src str, Signature>,
}

impl<'a, 'src> Compiler<'a, 'src> {
    pub fn new(items: &'a [Item<'src>]) -> Self {
        Self {
            items,
            functions: HashMap::new(),
        }
    }

    pub fn compile(&mut self) -> CResult<Vec<u8>> {
        let mut types = TypeSection::new();
        let mut imports = ImportSection::new();
        let mut functions = FunctionSection::new();
        let mut exports = ExportSection::new();
        let mut code = CodeSection::new();

        let items = self.items;

        // Imports occupy the lowest function indices.
        let externs = items.iter().filter_map(|item| match item {
            Item::Fn(decl) if !decl.is_definition() => Some(decl),
            _ => None,
        });
        let mut next_index: FunctionIndex = 0;
        for decl in externs {
            let index = self.declare(decl, next_index, &mut types)?;
            imports.import(IMPORT_MODULE, decl.proto.id, EntityType::Function(index));
            next_index += 1;
        }

        let mut anon_count = 0;
        for item in items {
            match item {
                Item::Fn(decl) => {
                    let Some(body) = &decl.body else {
                        continue;
                    };
                    let index = self.declare(decl, next_index, &mut types)?;
                    let locals: HashMap<&str, LocalIndex> = decl
                        .proto
                        .params
                        .iter()
                        .enumerate()
                        .map(|(i, p)| (p.id, i as LocalIndex))
                        .collect();

                    let f = self.compile_fn(body, &locals, decl.proto.ret != Type::Void)?;
                    functions.function(index);
                    exports.export(decl.proto.id, ExportKind::Func, index);
                    code.function(&f);
                }
                Item::Expr(expr) => {
                    let index = next_index;
                    types.function(Vec::<ValType>::new(), vec![ValType::F64]);

                    let f = self.compile_fn(expr, &HashMap::new(), true)?;
                    functions.function(index);
                    exports.export(&format!("__anon_expr{anon_count}"), ExportKind::Func, index);
                    code.function(&f);
                    anon_count += 1;
                }
            }
            next_index += 1;
        }

        let mut module = Module::new();
        module.section(&types);
        module.section(&imports);
        module.section(&functions);
        module.section(&exports);
        module.section(&code);

        Ok(module.finish())
    }

    /// Registers a function signature. Type indices and function indices
    /// coincide since every function gets its own type entry.
    fn declare(
        &mut self,
        decl: &FnDecl<'src>,
        index: FunctionIndex,
        types: &mut TypeSection,
    ) -> CResult<FunctionIndex> {
        let proto = &decl.proto;
        let mut params = Vec::with_capacity(proto.params.len());
        for param in &proto.params {
            match Self::val_type(&param.ty)? {
                Some(ty) => params.push(ty),
                None => {
                    return Err(CodegenError(format!(
                        "parameter `{}` of `{}` cannot have type void",
                        param.id, proto.id
                    )))
                }
            }
        }
        let results: Vec<ValType> = Self::val_type(&proto.ret)?.into_iter().collect();
        let returns = !results.is_empty();

        types.function(params, results);
        log::debug!("{} => function {index}", proto.id);

        self.functions.insert(
            proto.id,
            Signature {
                index,
                arity: proto.params.len(),
                returns,
            },
        );
        Ok(index)
    }

    fn val_type(ty: &Type) -> CResult<Option<ValType>> {
        match ty {
            Type::Void => Ok(None),
            Type::Bool | Type::Int | Type::Float => Ok(Some(ValType::F64)),
            Type::Function { .. } => Err(CodegenError(format!(
                "function type `{ty}` is not a value type"
            ))),
        }
    }

    fn compile_fn(
        &self,
        body: &Expression<'src>,
        locals: &HashMap<&str, LocalIndex>,
        returns: bool,
    ) -> CResult<Function> {
        let mut instructions = vec![];
        let produced = self.compile_expr(body, locals, returns, &mut instructions)?;
        if !returns && produced {
            instructions.push(Instruction::Drop);
        }
        instructions.push(Instruction::End);

        let mut f = Function::new(Vec::<(u32, ValType)>::new());
        instructions.iter().for_each(|ins| {
            f.instruction(ins);
        });
        Ok(f)
    }

    /// Emits `expr` and returns whether it left a value on the stack. A call
    /// to a void function is only allowed where no value is `wanted`.
    fn compile_expr(
        &self,
        expr: &Expression<'src>,
        locals: &HashMap<&str, LocalIndex>,
        wanted: bool,
        instructions: &mut Vec<Instruction<'static>>,
    ) -> CResult<bool> {
        match expr {
            Expression::Number(v) => instructions.push(Instruction::F64Const(*v)),
            Expression::Var { id, .. } => match locals.get(id) {
                Some(index) => instructions.push(Instruction::LocalGet(*index)),
                None => {
                    return Err(CodegenError(format!("unknown variable `{id}`")));
                }
            },
            Expression::Binary { lhs, op, rhs } => {
                self.compile_expr(lhs, locals, true, instructions)?;
                self.compile_expr(rhs, locals, true, instructions)?;

                match op {
                    Operator::Plus => instructions.push(Instruction::F64Add),
                    Operator::Minus => instructions.push(Instruction::F64Sub),
                    Operator::Mul => instructions.push(Instruction::F64Mul),
                    Operator::Div => instructions.push(Instruction::F64Div),
                    Operator::Lt => {
                        instructions.push(Instruction::F64Lt);
                        instructions.push(Instruction::F64ConvertI32U);
                    }
                    Operator::Gt => {
                        instructions.push(Instruction::F64Gt);
                        instructions.push(Instruction::F64ConvertI32U);
                    }
                }
            }
            Expression::Call { id, params, .. } => {
                let sig = match self.functions.get(id) {
                    Some(sig) => sig,
                    None => return Err(CodegenError(format!("unknown function `{id}`"))),
                };
                if sig.arity != params.len() {
                    return Err(CodegenError(format!(
                        "`{id}` takes {} argument(s), {} given",
                        sig.arity,
                        params.len()
                    )));
                }
                if wanted && !sig.returns {
                    return Err(CodegenError(format!(
                        "`{id}` returns void and cannot be used as a value"
                    )));
                }

                for param in params {
                    self.compile_expr(param, locals, true, instructions)?;
                }
                instructions.push(Instruction::Call(sig.index));
                return Ok(sig.returns);
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod test {
    use super::Compiler;
    use crate::syntax::Parser;

    fn compile_to_wat(src: &str) -> String {
        let mut parser = Parser::new(src);
        let items = parser.parse_program();
        assert!(parser.diagnostics().is_empty());

        let bytes = Compiler::new(&items).compile().unwrap();
        wasmprinter::print_bytes(bytes).unwrap()
    }

    fn compile_err(src: &str) -> String {
        let mut parser = Parser::new(src);
        let items = parser.parse_program();
        Compiler::new(&items).compile().unwrap_err().0
    }

    #[test]
    fn simple() {
        let wat = compile_to_wat(
            "extern sin(x float) float
             fun twice(x float) float { sin(x) * 2 }
             twice(1) < 3",
        );

        assert!(wat.contains(r#"(import "env" "sin""#));
        assert!(wat.contains(r#"(export "twice""#));
        assert!(wat.contains(r#"(export "__anon_expr0""#));
        assert!(wat.contains("f64.mul"));
        assert!(wat.contains("f64.lt"));
        assert!(wat.contains("call 0"));
    }

    #[test]
    fn void_function_drops_its_value() {
        let wat = compile_to_wat("fun noop(x float) { x }");
        assert!(wat.contains("drop"));
    }

    #[test]
    fn void_call_as_void_body() {
        let wat = compile_to_wat("extern print(x float)\nfun main() { print(1) }");
        assert!(wat.contains(r#"(import "env" "print""#));
        assert!(wat.contains("call 0"));
        assert!(!wat.contains("drop"));

        let wat = compile_to_wat("extern print(x float)\nfun show(x float) { print(x + 1) }");
        assert!(wat.contains("f64.add"));
        assert!(!wat.contains("drop"));
    }

    #[test]
    fn unknown_names() {
        assert!(compile_err("fun f() float { y }").contains("unknown variable `y`"));
        assert!(compile_err("g(1)").contains("unknown function `g`"));
    }

    #[test]
    fn arity_mismatch() {
        let err = compile_err("extern f(a float, b float) float; f(1)");
        assert!(err.contains("takes 2 argument(s), 1 given"));
    }

    #[test]
    fn void_values_are_rejected() {
        assert!(compile_err("extern f(a void) float").contains("cannot have type void"));
        assert!(compile_err("extern f(a float); f(1) + 1").contains("returns void"));
        assert!(compile_err("extern f(a float); fun g() float { f(1) }").contains("returns void"));
        assert!(compile_err("extern f(a float); extern h(a float) float; h(f(1))")
            .contains("returns void"));
    }
}

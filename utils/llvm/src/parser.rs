use pest::{
	iterators::{Pair, Pairs},
	Parser,
};
use pest_derive::Parser;
use utils::{errors::Result, KernelError::LlvmSyntaxError, Label};

use crate::*;

#[derive(Parser)]
#[grammar = "llvmir.pest"]
struct IrParser;

fn syntax_error<T>(pair: &Pair<Rule>, msg: impl std::fmt::Display) -> Result<T> {
	let (line, col) = pair.as_span().start_pos().line_col();
	Err(LlvmSyntaxError(format!("{}:{}: {}", line, col, msg)))
}

fn next_pair<'a>(pairs: &mut Pairs<'a, Rule>) -> Result<Pair<'a, Rule>> {
	pairs
		.next()
		.ok_or_else(|| LlvmSyntaxError("unexpected end of input".to_string()))
}

fn parse_ident(pair: Pair<Rule>) -> String {
	match pair.as_rule() {
		Rule::Local | Rule::Global => pair.as_str()[1..].to_string(),
		Rule::LabelDef => pair.as_str().trim_end_matches(':').to_string(),
		_ => pair.as_str().to_string(),
	}
}

fn parse_label(pair: Pair<Rule>) -> Label {
	Label::new(parse_ident(pair))
}

fn parse_type(pair: Pair<Rule>) -> Result<VarType> {
	let inner = pair.into_inner().next();
	Ok(match inner.as_ref().map(|v| v.as_rule()) {
		Some(Rule::I1) => VarType::I1,
		Some(Rule::I32) => VarType::I32,
		Some(Rule::I64) => VarType::I64,
		Some(Rule::F32) => VarType::F32,
		Some(Rule::F64) => VarType::F64,
		Some(Rule::PtrT) => VarType::Ptr,
		Some(Rule::VoidT) => VarType::Void,
		_ => return Err(LlvmSyntaxError("expected a type".to_string())),
	})
}

fn parse_int_lit(pair: &Pair<Rule>, var_type: VarType) -> Result<Value> {
	let s = pair.as_str();
	let value = match var_type {
		VarType::I1 => match s {
			"0" => Some(Value::Bool(false)),
			"1" => Some(Value::Bool(true)),
			_ => None,
		},
		VarType::I32 => s.parse().ok().map(Value::Int),
		VarType::I64 => s.parse().ok().map(Value::Long),
		VarType::F32 => s.parse().ok().map(Value::Float),
		VarType::F64 => s.parse().ok().map(Value::Double),
		VarType::Ptr | VarType::Void => None,
	};
	match value {
		Some(value) => Ok(value),
		None => syntax_error(pair, format!("invalid {} literal '{}'", var_type, s)),
	}
}

fn parse_float_lit(pair: &Pair<Rule>, var_type: VarType) -> Result<Value> {
	let s = pair.as_str();
	let value = match var_type {
		VarType::F32 => s.parse().ok().map(Value::Float),
		VarType::F64 => s.parse().ok().map(Value::Double),
		_ => None,
	};
	match value {
		Some(value) => Ok(value),
		None => syntax_error(pair, format!("invalid {} literal '{}'", var_type, s)),
	}
}

// literals take the type of the instruction they appear in
fn parse_value(pair: Pair<Rule>, var_type: VarType) -> Result<Value> {
	let inner = next_pair(&mut pair.into_inner())?;
	match inner.as_rule() {
		Rule::Integer => parse_int_lit(&inner, var_type),
		Rule::FloatLit => parse_float_lit(&inner, var_type),
		Rule::BoolLit if var_type == VarType::I1 => {
			Ok(Value::Bool(inner.as_str() == "true"))
		}
		Rule::Local => Ok(Temp::local(parse_ident(inner), var_type).into()),
		Rule::Global => Ok(Temp::global(parse_ident(inner)).into()),
		_ => syntax_error(&inner, format!("unexpected {} operand", var_type)),
	}
}

fn parse_typed_value(pairs: &mut Pairs<Rule>) -> Result<(VarType, Value)> {
	let var_type = parse_type(next_pair(pairs)?)?;
	let value = parse_value(next_pair(pairs)?, var_type)?;
	Ok((var_type, value))
}

fn map_arith_op(s: &str) -> Option<ArithOp> {
	Some(match s {
		"add" => ArithOp::Add,
		"sub" => ArithOp::Sub,
		"mul" => ArithOp::Mul,
		"sdiv" => ArithOp::Div,
		"srem" => ArithOp::Rem,
		"fadd" => ArithOp::Fadd,
		"fsub" => ArithOp::Fsub,
		"fmul" => ArithOp::Fmul,
		"fdiv" => ArithOp::Fdiv,
		"frem" => ArithOp::Frem,
		"shl" => ArithOp::Shl,
		"lshr" => ArithOp::Lshr,
		"ashr" => ArithOp::Ashr,
		"and" => ArithOp::And,
		"or" => ArithOp::Or,
		"xor" => ArithOp::Xor,
		_ => return None,
	})
}

fn map_comp_op(s: &str) -> Option<CompOp> {
	Some(match s {
		"eq" => CompOp::EQ,
		"ne" => CompOp::NE,
		"ugt" => CompOp::UGT,
		"uge" => CompOp::UGE,
		"ult" => CompOp::ULT,
		"ule" => CompOp::ULE,
		"sgt" => CompOp::SGT,
		"sge" => CompOp::SGE,
		"slt" => CompOp::SLT,
		"sle" => CompOp::SLE,
		"oeq" => CompOp::OEQ,
		"one" => CompOp::ONE,
		"ogt" => CompOp::OGT,
		"oge" => CompOp::OGE,
		"olt" => CompOp::OLT,
		"ole" => CompOp::OLE,
		_ => return None,
	})
}

fn map_comp_kind(s: &str) -> Option<CompKind> {
	match s {
		"icmp" => Some(CompKind::Icmp),
		"fcmp" => Some(CompKind::Fcmp),
		_ => None,
	}
}

fn map_convert_op(s: &str) -> Option<ConvertOp> {
	Some(match s {
		"trunc" => ConvertOp::Trunc,
		"zext" => ConvertOp::Zext,
		"sext" => ConvertOp::Sext,
		"sitofp" => ConvertOp::Sitofp,
		"fptosi" => ConvertOp::Fptosi,
		_ => return None,
	})
}

fn parse_op<T>(pair: Pair<Rule>, map: fn(&str) -> Option<T>) -> Result<T> {
	match map(pair.as_str()) {
		Some(op) => Ok(op),
		None => syntax_error(&pair, format!("unknown operator '{}'", pair.as_str())),
	}
}

fn parse_arith(pair: Pair<Rule>) -> Result<LlvmInstr> {
	let mut pairs = pair.into_inner();
	let target = next_pair(&mut pairs)?;
	let op = parse_op(next_pair(&mut pairs)?, map_arith_op)?;
	let var_type = parse_type(next_pair(&mut pairs)?)?;
	Ok(Box::new(ArithInstr {
		target: Temp::local(parse_ident(target), var_type),
		op,
		var_type,
		lhs: parse_value(next_pair(&mut pairs)?, var_type)?,
		rhs: parse_value(next_pair(&mut pairs)?, var_type)?,
	}))
}

fn parse_comp(pair: Pair<Rule>) -> Result<LlvmInstr> {
	let mut pairs = pair.into_inner();
	let target = next_pair(&mut pairs)?;
	let kind = parse_op(next_pair(&mut pairs)?, map_comp_kind)?;
	let op = parse_op(next_pair(&mut pairs)?, map_comp_op)?;
	let var_type = parse_type(next_pair(&mut pairs)?)?;
	Ok(Box::new(CompInstr {
		kind,
		target: Temp::local(parse_ident(target), VarType::I1),
		op,
		var_type,
		lhs: parse_value(next_pair(&mut pairs)?, var_type)?,
		rhs: parse_value(next_pair(&mut pairs)?, var_type)?,
	}))
}

fn parse_convert(pair: Pair<Rule>) -> Result<LlvmInstr> {
	let mut pairs = pair.into_inner();
	let target = next_pair(&mut pairs)?;
	let op = parse_op(next_pair(&mut pairs)?, map_convert_op)?;
	let (from_type, lhs) = parse_typed_value(&mut pairs)?;
	let to_type = parse_type(next_pair(&mut pairs)?)?;
	Ok(Box::new(ConvertInstr {
		target: Temp::local(parse_ident(target), to_type),
		op,
		from_type,
		lhs,
		to_type,
	}))
}

fn parse_load(pair: Pair<Rule>) -> Result<LlvmInstr> {
	let mut pairs = pair.into_inner();
	let target = next_pair(&mut pairs)?;
	let var_type = parse_type(next_pair(&mut pairs)?)?;
	let (_, addr) = parse_typed_value(&mut pairs)?;
	Ok(Box::new(LoadInstr {
		target: Temp::local(parse_ident(target), var_type),
		var_type,
		addr,
	}))
}

fn parse_gep(pair: Pair<Rule>) -> Result<LlvmInstr> {
	let mut pairs = pair.into_inner();
	let target = next_pair(&mut pairs)?;
	let var_type = parse_type(next_pair(&mut pairs)?)?;
	let (_, addr) = parse_typed_value(&mut pairs)?;
	let (_, offset) = parse_typed_value(&mut pairs)?;
	Ok(Box::new(GEPInstr {
		target: Temp::local(parse_ident(target), VarType::Ptr),
		var_type,
		addr,
		offset,
	}))
}

fn parse_call(pair: Pair<Rule>) -> Result<LlvmInstr> {
	let mut pairs = pair.into_inner().peekable();
	let target = match pairs.peek().map(|v| v.as_rule()) {
		Some(Rule::CallDef) => pairs.next().and_then(|v| v.into_inner().next()),
		_ => None,
	};
	let mut pairs = pairs.collect::<Vec<_>>().into_iter();
	let (Some(ret), Some(func)) = (pairs.next(), pairs.next()) else {
		return Err(LlvmSyntaxError("malformed call".to_string()));
	};
	let var_type = parse_type(ret)?;
	let params = pairs
		.map(|arg| parse_typed_value(&mut arg.into_inner()))
		.collect::<Result<Vec<_>>>()?;
	Ok(Box::new(CallInstr {
		target: target.map(|v| Temp::local(parse_ident(v), var_type)),
		var_type,
		func: parse_label(func),
		params,
	}))
}

fn parse_store(pair: Pair<Rule>) -> Result<LlvmInstr> {
	let mut pairs = pair.into_inner();
	let (_, value) = parse_typed_value(&mut pairs)?;
	let (_, addr) = parse_typed_value(&mut pairs)?;
	Ok(Box::new(StoreInstr { value, addr }))
}

fn parse_phi(pair: Pair<Rule>) -> Result<PhiInstr> {
	let mut pairs = pair.into_inner();
	let target = next_pair(&mut pairs)?;
	let var_type = parse_type(next_pair(&mut pairs)?)?;
	let source = pairs
		.map(|source| {
			let mut inner = source.into_inner();
			let value = parse_value(next_pair(&mut inner)?, var_type)?;
			Ok((value, parse_label(next_pair(&mut inner)?)))
		})
		.collect::<Result<Vec<_>>>()?;
	Ok(PhiInstr {
		target: Temp::local(parse_ident(target), var_type),
		var_type,
		source,
	})
}

fn parse_terminator(pair: Pair<Rule>) -> Result<LlvmInstr> {
	let inner = next_pair(&mut pair.into_inner())?;
	let rule = inner.as_rule();
	let mut pairs = inner.into_inner();
	Ok(match rule {
		Rule::Jump => Box::new(JumpInstr {
			target: parse_label(next_pair(&mut pairs)?),
		}),
		Rule::JumpCond => {
			let (var_type, cond) = parse_typed_value(&mut pairs)?;
			Box::new(JumpCondInstr {
				var_type,
				cond,
				target_true: parse_label(next_pair(&mut pairs)?),
				target_false: parse_label(next_pair(&mut pairs)?),
			})
		}
		Rule::Ret => {
			let first = pairs.peek().map(|v| v.as_rule());
			let value = match first {
				Some(Rule::VoidT) | None => None,
				_ => Some(parse_typed_value(&mut pairs)?.1),
			};
			Box::new(RetInstr { value })
		}
		_ => unreachable!(),
	})
}

fn parse_instr(pair: Pair<Rule>) -> Result<LlvmInstr> {
	let inner = next_pair(&mut pair.into_inner())?;
	match inner.as_rule() {
		Rule::Arith => parse_arith(inner),
		Rule::Comp => parse_comp(inner),
		Rule::Convert => parse_convert(inner),
		Rule::Load => parse_load(inner),
		Rule::Gep => parse_gep(inner),
		Rule::Call => parse_call(inner),
		Rule::Store => parse_store(inner),
		_ => unreachable!(),
	}
}

fn check_typed(pair: &Pair<Rule>, instr: &dyn LlvmInstrTrait) -> Result<()> {
	if instr.type_valid() {
		Ok(())
	} else {
		syntax_error(pair, format!("ill-typed instruction '{}'", instr))
	}
}

fn parse_block(pair: Pair<Rule>) -> Result<ModuleBlock> {
	let mut pairs = pair.into_inner();
	let label = parse_label(next_pair(&mut pairs)?);
	let mut phi_instrs = Vec::new();
	let mut instrs = Vec::new();
	for pair in pairs {
		match pair.as_rule() {
			Rule::Phi => {
				let phi = parse_phi(pair.clone())?;
				check_typed(&pair, &phi)?;
				phi_instrs.push(phi);
			}
			Rule::Instr => {
				let instr = parse_instr(pair.clone())?;
				check_typed(&pair, instr.as_ref())?;
				instrs.push(instr);
			}
			Rule::Terminator => {
				let jump_instr = parse_terminator(pair.clone())?;
				check_typed(&pair, jump_instr.as_ref())?;
				return Ok(ModuleBlock {
					label,
					phi_instrs,
					instrs,
					jump_instr,
				});
			}
			_ => unreachable!(),
		}
	}
	Err(LlvmSyntaxError(format!("block %{} has no terminator", label)))
}

fn parse_func(pair: Pair<Rule>) -> Result<ModuleFunc> {
	let mut pairs = pair.into_inner();
	let ret_type = parse_type(next_pair(&mut pairs)?)?;
	let name = parse_ident(next_pair(&mut pairs)?);
	let mut params = Vec::new();
	let mut blocks = Vec::new();
	for pair in pairs {
		match pair.as_rule() {
			Rule::Param => {
				let mut inner = pair.into_inner();
				let var_type = parse_type(next_pair(&mut inner)?)?;
				params.push(Temp::local(parse_ident(next_pair(&mut inner)?), var_type));
			}
			Rule::Block => blocks.push(parse_block(pair)?),
			_ => unreachable!(),
		}
	}
	Ok(ModuleFunc {
		name,
		ret_type,
		params,
		blocks,
	})
}

fn parse_global(pair: Pair<Rule>) -> Result<GlobalVar> {
	let mut ident = None;
	let mut var_type = VarType::Void;
	let mut init = None;
	for pair in pair.into_inner() {
		match pair.as_rule() {
			Rule::Global => ident = Some(parse_ident(pair)),
			Rule::Type => var_type = parse_type(pair)?,
			Rule::GlobalInit => init = Some(parse_value(pair, var_type)?),
			_ => {}
		}
	}
	match ident {
		Some(ident) => Ok(GlobalVar::new(ident, var_type, init)),
		None => Err(LlvmSyntaxError("global without a name".to_string())),
	}
}

pub fn parse(str: &str) -> Result<LlvmModule> {
	let program = IrParser::parse(Rule::Program, str)
		.map_err(|e| LlvmSyntaxError(e.to_string()))?;
	let mut module = LlvmModule::default();
	for pair in program.flat_map(|v| v.into_inner()) {
		match pair.as_rule() {
			Rule::GlobalDecl => module.global_vars.push(parse_global(pair)?),
			Rule::Func => module.funcs.push(parse_func(pair)?),
			Rule::EOI => {}
			_ => unreachable!(),
		}
	}
	Ok(module)
}

#[cfg(test)]
mod tests {
	use super::*;

	const KERNEL: &str = r#"
@_local_id_x = external global i64
@scale = global float 2.5

; one work-item of a guarded 1D kernel
define void @kernel(i32 %n, ptr %out) {
entry:
  %x = load i64, ptr @_local_id_x
  %gx = add i64 %x, 0
  %gx32 = trunc i64 %gx to i32
  %in = icmp ult i32 %gx32, %n
  br i1 %in, label %body, label %exit
body:
  %p = getelementptr float, ptr %out, i32 %gx32
  %v = call float @llvm.fmuladd.f32(float 1.0, float 2.0, float 0.5)
  store float %v, ptr %p
  br label %exit
exit:
  ret void
}
"#;

	#[test]
	fn parse_kernel() {
		let module = parse(KERNEL).unwrap();
		assert_eq!(module.global_vars.len(), 2);
		assert_eq!(module.global_vars[0].to_string(), "@_local_id_x = external global i64");
		assert_eq!(module.global_vars[1].to_string(), "@scale = global float 2.5");

		let func = &module.funcs[0];
		assert_eq!(func.name, "kernel");
		assert_eq!(func.params.len(), 2);
		assert_eq!(func.params[0].var_type, VarType::I32);
		assert_eq!(func.blocks.len(), 3);
		assert_eq!(func.blocks[0].instrs.len(), 4);
		assert_eq!(
			func.blocks[0].instrs[3].to_string(),
			"%in = icmp ult i32 %gx32, %n"
		);
		assert_eq!(
			func.blocks[0].jump_instr.to_string(),
			"br i1 %in, label %body, label %exit"
		);
		assert_eq!(
			func.blocks[1].instrs[1].to_string(),
			"%v = call float @llvm.fmuladd.f32(float 1.0, float 2.0, float 0.5)"
		);
		assert!(func.blocks[2].jump_instr.is_ret());
	}

	#[test]
	fn parse_phi_and_literals() {
		let module = parse(
			r#"
define i32 @count(i32 %n) {
entry:
  br label %head
head:
  %i = phi i32 [ 0, %entry ], [ %next, %head ]
  %next = add i32 %i, 1
  %done = icmp sge i32 %next, %n
  br i1 %done, label %out, label %head
out:
  ret i32 %next
}
"#,
		)
		.unwrap();
		let head = &module.funcs[0].blocks[1];
		assert_eq!(head.phi_instrs.len(), 1);
		assert_eq!(
			head.phi_instrs[0].to_string(),
			"%i = phi i32 [ 0, %entry ], [ %next, %head ]"
		);
		assert_eq!(head.phi_instrs[0].source[0].0, Value::Int(0));
	}

	#[test]
	fn reject_bad_input() {
		// missing terminator
		assert!(parse("define void @f() {\nentry:\n  %a = add i32 1, 2\n}").is_err());
		// trunc must narrow
		assert!(parse(
			"define void @f(i32 %a) {\nentry:\n  %b = trunc i32 %a to i64\n  ret void\n}"
		)
		.is_err());
		// i1 literals are 0 or 1
		assert!(parse(
			"define void @f() {\nentry:\n  br i1 2, label %entry, label %entry\n}"
		)
		.is_err());
	}
}

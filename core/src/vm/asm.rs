//! Plain-text instruction listings.
//!
//! [`disassemble`] prints one instruction per line as `OFFSET MNEMONIC [OPERAND]`.
//! [`assemble`] reads that format back, and also accepts lines copied from `dis` output,
//! where source line numbers, `>>` jump markers and `N (annotation)` operands appear.

use std::fmt::Write as _;

use crate::error::VmError;

use super::bytecode::{BinaryOp, Constant, Instruction, parse_int_literal};

pub fn disassemble(program: &[Instruction]) -> String {
    let mut out = String::new();
    for (offset, instr) in program.iter().enumerate() {
        let _ = writeln!(out, "{offset:>4} {instr}");
    }
    out
}

pub fn assemble(listing: &str) -> Result<Vec<Instruction>, VmError> {
    let mut program = Vec::new();
    for (idx, raw) in listing.lines().enumerate() {
        let line = idx + 1;
        let text = strip_comment(raw).trim();
        if text.is_empty() {
            continue;
        }
        program.push(parse_line(text, line)?);
    }
    Ok(program)
}

fn parse_line(text: &str, line: usize) -> Result<Instruction, VmError> {
    let mut rest = text;
    loop {
        let (token, tail) = split_token(rest);
        if token == ">>" || (!token.is_empty() && token.chars().all(|c| c.is_ascii_digit())) {
            rest = tail;
        } else {
            break;
        }
    }
    let (mnemonic, operand) = split_token(rest);
    if !is_mnemonic(mnemonic) {
        return Err(assembly_error(line, format!("expected an opcode name, found '{mnemonic}'")));
    }
    let operand = strip_annotation(operand);

    let instr = match mnemonic {
        "LOAD_CONST" => Instruction::LoadConst(parse_constant(operand, line)?),
        "LOAD_NAME" => Instruction::LoadName(parse_name(operand, line)?),
        "STORE_NAME" => Instruction::StoreName(parse_name(operand, line)?),
        "RETURN_VALUE" => no_operand(Instruction::ReturnValue, operand, line)?,
        "POP_TOP" => no_operand(Instruction::PopTop, operand, line)?,
        "CALL_FUNCTION" => Instruction::CallFunction(parse_count(operand, line)?),
        "CALL_FUNCTION_KW" => Instruction::CallFunctionKw(parse_count(operand, line)?),
        "BUILD_LIST" => Instruction::BuildList(parse_count(operand, line)?),
        "BINARY_ADD" => binary(BinaryOp::Add, operand, line)?,
        "BINARY_SUBTRACT" => binary(BinaryOp::Subtract, operand, line)?,
        "BINARY_MULTIPLY" => binary(BinaryOp::Multiply, operand, line)?,
        "BINARY_TRUE_DIVIDE" => binary(BinaryOp::Divide, operand, line)?,
        "BINARY_FLOOR_DIVIDE" => binary(BinaryOp::FloorDivide, operand, line)?,
        "BINARY_MODULO" => binary(BinaryOp::Modulo, operand, line)?,
        "BINARY_POWER" => binary(BinaryOp::Power, operand, line)?,
        "BINARY_OP" | "COMPARE_OP" => {
            let op = BinaryOp::from_symbol(operand)
                .ok_or_else(|| assembly_error(line, format!("unknown operator '{operand}'")))?;
            Instruction::BinaryOperation(op)
        }
        other => {
            return Err(VmError::InstructionNotImplemented {
                instr: other.to_string(),
                line,
            });
        }
    };
    Ok(instr)
}

fn assembly_error(line: usize, message: String) -> VmError {
    VmError::Assembly { line, message }
}

fn no_operand(instr: Instruction, operand: &str, line: usize) -> Result<Instruction, VmError> {
    if operand.is_empty() {
        Ok(instr)
    } else {
        Err(assembly_error(
            line,
            format!("{} takes no operand, found '{operand}'", instr.mnemonic()),
        ))
    }
}

fn binary(op: BinaryOp, operand: &str, line: usize) -> Result<Instruction, VmError> {
    no_operand(Instruction::BinaryOperation(op), operand, line)
}

fn parse_count(operand: &str, line: usize) -> Result<u32, VmError> {
    operand
        .parse()
        .map_err(|_| assembly_error(line, format!("expected a count, found '{operand}'")))
}

fn parse_name(operand: &str, line: usize) -> Result<String, VmError> {
    let mut chars = operand.chars();
    let valid = match chars.next() {
        Some(first) => (first.is_alphabetic() || first == '_') && chars.all(|c| c.is_alphanumeric() || c == '_'),
        None => false,
    };
    if valid {
        Ok(operand.to_string())
    } else {
        Err(assembly_error(line, format!("expected an identifier, found '{operand}'")))
    }
}

fn parse_constant(operand: &str, line: usize) -> Result<Constant, VmError> {
    match operand {
        "None" => return Ok(Constant::None),
        "True" => return Ok(Constant::Boolean(true)),
        "False" => return Ok(Constant::Boolean(false)),
        _ => {}
    }
    if let Some(n) = parse_int_literal(operand) {
        return Ok(Constant::Integer(n));
    }
    if let Some(s) = parse_string_literal(operand) {
        return Ok(Constant::String(s));
    }
    Err(assembly_error(line, format!("unsupported constant '{operand}'")))
}

/// Parse a single- or double-quoted literal. Unknown escapes keep their backslash.
fn parse_string_literal(raw: &str) -> Option<String> {
    let quote = raw.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let body = raw.strip_prefix(quote)?.strip_suffix(quote)?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch == quote {
            return None;
        }
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Some(out)
}

/// `0 (print)` becomes `print`; anything else is returned unchanged.
fn strip_annotation(operand: &str) -> &str {
    let (index, tail) = split_token(operand);
    let is_index = !index.is_empty() && index.chars().all(|c| c.is_ascii_digit());
    if is_index && let Some(inner) = tail.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        return inner;
    }
    operand
}

fn strip_comment(raw: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, ch) in raw.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
            }
            None if ch == '\'' || ch == '"' => quote = Some(ch),
            None if ch == '#' => return &raw[..idx],
            None => {}
        }
    }
    raw
}

fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim()),
        None => (s, ""),
    }
}

fn is_mnemonic(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_uppercase())
        && token.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

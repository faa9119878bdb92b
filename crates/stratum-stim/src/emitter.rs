//! Emitter serializing circuits to the flat text format.

use stratum_ir::{Circuit, Operation};

/// Emit a circuit as text, one instruction per line.
///
/// Repeat blocks are indented by four spaces per nesting level. The output
/// always ends with a newline unless the circuit is empty.
pub fn emit(circuit: &Circuit) -> String {
    let mut emitter = Emitter::new();
    emitter.emit_circuit(circuit);
    emitter.output
}

struct Emitter {
    output: String,
    indent: usize,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) {
        for operation in circuit {
            match operation {
                Operation::Instruction(instruction) => self.writeln(&instruction.to_string()),
                Operation::Repeat(block) => {
                    self.writeln(&format!("REPEAT {} {{", block.repetitions));
                    self.indent += 1;
                    self.emit_circuit(&block.body);
                    self.indent -= 1;
                    self.writeln("}");
                }
            }
        }
    }

    fn writeln(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
        self.output.push_str(line);
        self.output.push('\n');
    }
}

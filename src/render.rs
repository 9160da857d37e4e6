use std::{
    fmt::Display,
    io::{self, Write},
};

use crossterm::{
    queue,
    style::{self, Stylize},
};

use crate::{
    bitflip::Correction,
    circuit::Circuit,
    gate::GateType,
    instruction::Instruction,
    measurement::MeasurementOutcome,
    state::BlochVector,
};

/// Widest histogram bar in characters
pub const BAR_WIDTH: usize = 40;

/// Text rendering of a correction run
pub struct Terminal<W: Write> {
    out: W,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn correction(&mut self, correction: &Correction) -> io::Result<()> {
        self.heading(&format!(
            "Bit flip on qubit {}",
            correction.error_qubit.index()
        ))?;
        self.circuit(&correction.circuit)?;
        self.heading(&"Final state")?;
        self.print(&format!("{}\n", correction.state))?;
        self.heading(&format!("Histogram ({} shots)", correction.outcome.shots()))?;
        self.histogram(&correction.outcome)?;
        self.heading(&"Bloch vectors")?;
        self.bloch(&correction.bloch)?;
        self.out.flush()
    }

    pub fn circuit(&mut self, circuit: &Circuit) -> io::Result<()> {
        for line in circuit_diagram(circuit) {
            self.print(&format!("{line}\n"))?;
        }
        Ok(())
    }

    pub fn histogram(&mut self, outcome: &MeasurementOutcome) -> io::Result<()> {
        let max = outcome.max_count().max(1);
        for (bits, &count) in outcome.counts() {
            let len = (count * BAR_WIDTH / max).max(1);
            self.print(&format!(
                "{bits} │{:<BAR_WIDTH$} {count} ({:.3})\n",
                "█".repeat(len),
                outcome.frequency(bits)
            ))?;
        }
        Ok(())
    }

    pub fn bloch(&mut self, vectors: &[BlochVector]) -> io::Result<()> {
        for (q, v) in vectors.iter().enumerate() {
            self.print(&format!("q{q}: {v}\n"))?;
        }
        Ok(())
    }

    pub fn heading<T: Display>(&mut self, text: &T) -> io::Result<()> {
        queue!(
            self.out,
            style::PrintStyledContent(format!("\n{text}\n").bold().cyan())
        )
    }

    pub fn error<T: Display>(&mut self, output: &T) -> io::Result<()> {
        queue!(
            self.out,
            style::PrintStyledContent("Error: ".red()),
            style::Print(format!("{output}\n"))
        )?;
        self.out.flush()
    }

    pub fn print<T: Display>(&mut self, output: &T) -> io::Result<()> {
        queue!(self.out, style::Print(output))
    }
}

/// One line per qubit, one three character column per instruction
pub fn circuit_diagram(circuit: &Circuit) -> Vec<String> {
    let n = circuit.n_qubits();
    let width = n.saturating_sub(1).to_string().len();
    let mut rows: Vec<String> = (0..n).map(|q| format!("q{q:<width$}: ─")).collect();

    for inst in circuit.instructions() {
        let span = inst.qubits().get_indices();
        let (lo, hi) = match (span.first(), span.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => continue,
        };

        for (q, row) in rows.iter_mut().enumerate() {
            let symbol = match inst {
                Instruction::Gate(gate) if gate.get_target_bits().contains(q) => {
                    match (gate.get_type(), gate.get_control_bits().count()) {
                        (GateType::H, _) => 'H',
                        (GateType::X, 0) => 'X',
                        (GateType::X, _) => '⊕',
                    }
                }
                Instruction::Gate(gate) if gate.get_control_bits().contains(q) => '●',
                Instruction::Measurement(qbits) if qbits.contains(q) => 'M',
                _ if lo < q && q < hi && inst.is_gate() => '┼',
                _ => '─',
            };
            row.push('─');
            row.push(symbol);
            row.push('─');
        }
    }

    rows.iter_mut().for_each(|row| row.push('─'));
    rows
}

use num_bigint::BigInt;
use serde::Deserialize;
use tracing::{trace, warn};

use crate::config::SessionConfig;
use crate::convert::Catalog;
use crate::currency;
use crate::errors::*;
use crate::history::{Evaluation, History};
use crate::parse::evaluate;
use crate::plugins::PluginRegistry;
use crate::programmer::{Base, BitwiseOp, IntegerEngine, WordSize};
use crate::value::*;

const ERROR_TEXT: &str = "Error";
const CURRENCY: &str = "Currency";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Mode {
    Standard,
    Scientific,
    Programmer,
    DateCalc,
    Converter,
    Graphing,
}

/// Binary operators of the standard keypad
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// The glyph written into the expression buffer
    pub fn glyph(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '×',
            Operator::Div => '÷',
        }
    }
}

/// Keys applied immediately to the displayed value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryFunc {
    Sqrt,
    Square,
    Reciprocal,
    Negate,
    Percent,
    /// trigonometric keys take degrees
    Sin,
    Cos,
    Tan,
    Ln,
    Log,
    Factorial,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryKey {
    Clear,
    Recall,
    Store,
    Add,
    Subtract,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// `0`-`9`, and `A`-`F` in programmer mode
    Digit(char),
    Point,
    Operator(Operator),
    Unary(UnaryFunc),
    Pi,
    E,
    Bitwise(BitwiseOp),
    Equals,
    Clear,
    ClearEntry,
    Backspace,
    Memory(MemoryKey),
}

/// Binary bitwise operator waiting for its second operand
#[derive(Clone, Debug, PartialEq)]
pub struct PendingBitwiseOp {
    pub op: BitwiseOp,
    pub first: BigInt,
}

/// State of one interactive calculator. Engine errors never escape a key
/// press: they switch the display to `Error` until the next full clear
pub struct CalculatorSession {
    mode: Mode,
    // committed part of the expression, e.g. `2 + `
    prefix: String,
    // operand being typed or the last result
    entry: String,
    // entry holds a result, the next digit starts a new number
    fresh: bool,
    error: bool,
    memory: Value,
    pending: Option<PendingBitwiseOp>,
    base: Base,
    engine: IntegerEngine,
    plugins: PluginRegistry,
    history: History,
}

impl Default for CalculatorSession {
    fn default() -> Self {
        CalculatorSession::new(&SessionConfig::default())
    }
}

impl CalculatorSession {
    pub fn new(config: &SessionConfig) -> Self {
        CalculatorSession {
            mode: config.mode,
            prefix: String::new(),
            entry: "0".to_owned(),
            fresh: true,
            error: false,
            memory: Value::new(),
            pending: None,
            base: Base::Dec,
            engine: IntegerEngine::new(config.word_size, config.signed),
            plugins: PluginRegistry::default(),
            history: History::new(config.history_capacity),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches the mode. The entry, expression buffer, pending operator
    /// and error state are reset, memory and word size are kept
    pub fn set_mode(&mut self, mode: Mode) {
        trace!(from = ?self.mode, to = ?mode, "mode switched");
        self.mode = mode;
        self.reset();
    }

    /// Text to show: the current entry, or `Error`
    pub fn display(&self) -> &str {
        if self.error {
            ERROR_TEXT
        } else if self.entry.is_empty() {
            "0"
        } else {
            &self.entry
        }
    }

    /// Pending expression buffer including the current entry
    pub fn expression(&self) -> String {
        format!("{}{}", self.prefix, self.entry)
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn pending(&self) -> Option<&PendingBitwiseOp> {
        self.pending.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }

    pub fn engine(&self) -> &IntegerEngine {
        &self.engine
    }

    pub fn base(&self) -> Base {
        self.base
    }

    /// Switches the programmer base, the entry is rewritten in the new base
    pub fn set_base(&mut self, base: Base) {
        self.rewrite_entry(self.base, base);
        self.base = base;
    }

    /// Changes the register width for subsequent operations. The entry is
    /// wrapped to the new width, the memory register is not touched
    pub fn set_word_size(&mut self, word_size: WordSize) {
        self.engine.word_size = word_size;
        self.rewrite_entry(self.base, self.base);
    }

    /// Switches between signed (two's complement) and unsigned decimal
    /// display. Other bases always show the raw bits
    pub fn set_signed(&mut self, signed: bool) {
        self.engine.signed = signed;
        self.rewrite_entry(self.base, self.base);
    }

    fn rewrite_entry(&mut self, from: Base, to: Base) {
        if self.mode != Mode::Programmer || self.error {
            return;
        }
        match self.engine.parse(self.display(), from) {
            Ok(v) => {
                self.entry = self.engine.format(&v, to);
                trace!(%from, %to, entry = %self.entry, "entry rewritten");
            }
            Err(e) => {
                self.fail(e);
            }
        }
    }

    // ---------------- memory register ----------------

    pub fn memory(&self) -> &Value {
        &self.memory
    }

    pub fn memory_store(&mut self, v: Value) -> Value {
        self.memory = v;
        self.memory.clone()
    }

    pub fn memory_recall(&self) -> Value {
        self.memory.clone()
    }

    pub fn memory_clear(&mut self) -> Value {
        self.memory = Value::new();
        self.memory.clone()
    }

    pub fn memory_add(&mut self, v: Value) -> Result<Value, CalcError> {
        self.memory = self.memory.clone().addition(v)?;
        Ok(self.memory.clone())
    }

    pub fn memory_subtract(&mut self, v: Value) -> Result<Value, CalcError> {
        self.memory = self.memory.clone().subtract(v)?;
        Ok(self.memory.clone())
    }

    // ---------------- converter ----------------

    /// Categories offered by the converter: the built-in catalog, currency
    /// and then registered plugins
    pub fn converter_categories(&self) -> Vec<&str> {
        let mut cats = Catalog::builtin().categories();
        cats.push(CURRENCY);
        cats.extend(self.plugins.names());
        cats
    }

    pub fn converter_units(&self, category: &str) -> Result<Vec<&str>, CalcError> {
        if category == CURRENCY {
            return Ok(currency::currencies());
        }
        match self.plugins.get(category) {
            Some(p) => Ok(p.units()),
            None => Catalog::builtin().units(category),
        }
    }

    pub fn convert(&self, value: f64, category: &str, from: &str, to: &str) -> Result<f64, CalcError> {
        if category == CURRENCY {
            return currency::convert(value, from, to);
        }
        match self.plugins.get(category) {
            Some(p) => p.convert(value, from, to),
            None => Catalog::builtin().convert(value, category, from, to),
        }
    }

    // ---------------- keys ----------------

    fn reset(&mut self) {
        self.prefix.clear();
        self.entry = "0".to_owned();
        self.fresh = true;
        self.error = false;
        self.pending = None;
    }

    fn fail(&mut self, err: CalcError) -> Option<Evaluation> {
        warn!(error = %err, expression = %self.expression(), "calculation failed");
        self.error = true;
        None
    }

    fn set_result(&mut self, text: String) {
        self.entry = text;
        self.fresh = true;
    }

    fn type_char(&mut self, c: char) {
        if self.fresh || self.entry == "0" || self.entry.is_empty() {
            self.entry = c.to_string();
        } else {
            self.entry.push(c);
        }
        self.fresh = false;
    }

    // sign of a number being typed flips as text, so `5.` stays `-5.`
    fn toggle_sign(&mut self) {
        if let Some(rest) = self.entry.strip_prefix('-') {
            self.entry = rest.to_owned();
        } else if !self.entry.is_empty() && self.entry != "0" {
            self.entry.insert(0, '-');
        }
    }

    fn backspace(&mut self) {
        self.entry.pop();
        if self.entry.is_empty() || self.entry == "-" {
            self.entry = "0".to_owned();
        }
        self.fresh = false;
    }

    fn current_value(&self) -> CalcResult {
        if self.mode == Mode::Programmer {
            let i = self.engine.parse(self.display(), self.base)?;
            return Ok(Value::from(i));
        }
        Value::from_str_number(self.display())
    }

    fn show_value(&mut self, v: &Value) {
        let text = if self.mode == Mode::Programmer {
            self.engine.format(&v.to_bigint(), self.base)
        } else {
            v.render()
        };
        self.set_result(text);
    }

    /// Handles one key press. Returns the finished calculation when the key
    /// completed one, so the caller can log it elsewhere as well
    pub fn press(&mut self, key: Key) -> Option<Evaluation> {
        trace!(?key, mode = ?self.mode, "key");
        if self.error && key != Key::Clear {
            return None;
        }
        match key {
            Key::Clear => {
                self.reset();
                None
            }
            Key::ClearEntry => {
                self.set_result("0".to_owned());
                None
            }
            Key::Backspace => {
                self.backspace();
                None
            }
            Key::Memory(m) => self.press_memory(m),
            _ => match self.mode {
                Mode::Standard | Mode::Scientific => self.press_standard(key),
                Mode::Programmer => self.press_programmer(key),
                // the remaining modes do not use the keypad
                Mode::DateCalc | Mode::Converter | Mode::Graphing => None,
            },
        }
    }

    fn press_memory(&mut self, key: MemoryKey) -> Option<Evaluation> {
        if key == MemoryKey::Clear {
            self.memory_clear();
            return None;
        }
        if key == MemoryKey::Recall {
            let v = self.memory_recall();
            self.show_value(&v);
            return None;
        }
        let v = match self.current_value() {
            Ok(v) => v,
            Err(e) => return self.fail(e),
        };
        let res = match key {
            MemoryKey::Store => Ok(self.memory_store(v)),
            MemoryKey::Add => self.memory_add(v),
            _ => self.memory_subtract(v),
        };
        match res {
            Ok(..) => {
                self.fresh = true;
                None
            }
            Err(e) => self.fail(e),
        }
    }

    fn apply_unary(&self, f: UnaryFunc, v: Value) -> CalcResult {
        match f {
            UnaryFunc::Sqrt => v.sqrt(),
            UnaryFunc::Square => v.sqr(),
            UnaryFunc::Reciprocal => v.reciprocal(),
            UnaryFunc::Negate => v.negate(),
            UnaryFunc::Percent => v.percent(),
            UnaryFunc::Sin => v.rad()?.sin(),
            UnaryFunc::Cos => v.rad()?.cos(),
            UnaryFunc::Tan => v.rad()?.tan(),
            UnaryFunc::Ln => v.ln(),
            UnaryFunc::Log => v.log10(),
            UnaryFunc::Factorial => v.fact(),
        }
    }

    fn press_standard(&mut self, key: Key) -> Option<Evaluation> {
        match key {
            Key::Digit(c) if c.is_ascii_digit() => self.type_char(c),
            Key::Point => {
                if self.fresh || self.entry.is_empty() {
                    self.entry = "0.".to_owned();
                    self.fresh = false;
                } else if !self.entry.contains('.') {
                    self.entry.push('.');
                }
            }
            Key::Operator(op) => {
                if self.entry.is_empty() && !self.prefix.is_empty() {
                    // operator pressed twice: the last one wins
                    let mut p = self.prefix.trim_end().to_owned();
                    p.pop();
                    self.prefix = p.trim_end().to_owned();
                } else {
                    let entry = std::mem::take(&mut self.entry);
                    self.prefix.push_str(&entry);
                }
                self.prefix.push(' ');
                self.prefix.push(op.glyph());
                self.prefix.push(' ');
                self.entry.clear();
                self.fresh = false;
            }
            Key::Unary(UnaryFunc::Negate) if !self.fresh => self.toggle_sign(),
            Key::Unary(f) => {
                let res = self.current_value().and_then(|v| self.apply_unary(f, v));
                match res {
                    Ok(v) => self.set_result(v.render()),
                    Err(e) => return self.fail(e),
                }
            }
            Key::Pi => self.set_result(Value::pi().render()),
            Key::E => self.set_result(Value::e().render()),
            Key::Equals => return self.equals_standard(),
            _ => trace!(?key, "key ignored"),
        }
        None
    }

    fn equals_standard(&mut self) -> Option<Evaluation> {
        let expression = self.expression();
        if expression.trim().is_empty() {
            return None;
        }
        match evaluate(&expression) {
            Ok(result) => {
                self.prefix.clear();
                self.set_result(result.render());
                let eval = Evaluation { expression, result };
                self.history.record(&eval);
                Some(eval)
            }
            Err(e) => self.fail(e),
        }
    }

    fn press_programmer(&mut self, key: Key) -> Option<Evaluation> {
        match key {
            Key::Digit(c) => {
                let c = c.to_ascii_uppercase();
                if self.base.is_digit(c) {
                    self.type_char(c);
                } else {
                    trace!(digit = %c, base = %self.base, "digit not valid for base");
                }
            }
            Key::Bitwise(op) if op.is_unary() => {
                let res = self
                    .engine
                    .parse(self.display(), self.base)
                    .and_then(|v| self.engine.bitwise_op(&v, &BigInt::default(), op));
                match res {
                    Ok(v) => {
                        let text = self.engine.format(&v, self.base);
                        self.set_result(text);
                    }
                    Err(e) => return self.fail(e),
                }
            }
            Key::Bitwise(op) => match self.engine.parse(self.display(), self.base) {
                Ok(first) => {
                    self.pending = Some(PendingBitwiseOp { op, first });
                    self.set_result("0".to_owned());
                }
                Err(e) => return self.fail(e),
            },
            Key::Equals => return self.equals_programmer(),
            _ => trace!(?key, "key ignored"),
        }
        None
    }

    fn equals_programmer(&mut self) -> Option<Evaluation> {
        let pending = self.pending.take()?;
        let second = match self.engine.parse(self.display(), self.base) {
            Ok(v) => v,
            Err(e) => return self.fail(e),
        };
        match self.engine.bitwise_op(&pending.first, &second, pending.op) {
            Ok(r) => {
                let expression = format!(
                    "{} {} {}",
                    self.engine.format(&pending.first, self.base),
                    pending.op,
                    self.engine.format(&second, self.base)
                );
                let text = self.engine.format(&r, self.base);
                self.set_result(text);
                let eval = Evaluation {
                    expression,
                    result: Value::from(self.engine.to_signed(&r)),
                };
                self.history.record(&eval);
                Some(eval)
            }
            Err(e) => self.fail(e),
        }
    }
}

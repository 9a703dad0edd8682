//! Numeric feature detector.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::adjacent::AdjacentPatterns;
use super::lowered::LoweredText;
use super::number::parse_number;
use super::{compile_regex, FeaturePattern, PatternMatch, Span};
use crate::error::ConfigError;
use crate::models::config::{AdjacentRecord, ExceptionRecord, IndicatorRecord, ValueRecord};

/// Which validated occurrence of the indicator provides the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOrder {
    /// Leftmost occurrence.
    #[default]
    Straight,
    /// Rightmost occurrence.
    Reverse,
    /// Total of all occurrences, emitted only when positive.
    Sum,
    /// Occurrence with the largest value.
    Max,
    /// Occurrence with the smallest value.
    Min,
}

/// How a numeric value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueFormat {
    /// Rounded to the nearest integer, halves to even.
    Int,
    /// Decimal with a dot, optionally rounded, trailing zeros trimmed.
    Float {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        round: Option<u32>,
    },
    /// Same as `Float` with a comma as decimal separator.
    FloatComma {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        round: Option<u32>,
    },
}

impl Default for ValueFormat {
    fn default() -> Self {
        Self::Float { round: None }
    }
}

impl ValueFormat {
    pub fn render(&self, value: f64) -> String {
        match *self {
            Self::Int => format!("{}", value.round_ties_even() as i64),
            Self::Float { round } => render_float(value, round),
            Self::FloatComma { round } => render_float(value, round).replace('.', ","),
        }
    }
}

fn render_float(value: f64, round: Option<u32>) -> String {
    let text = match round {
        Some(digits) => format!("{:.*}", digits as usize, value),
        None => value.to_string(),
    };
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Where a value is expected: a regex, optionally constrained by the text
/// on either side of its match.
#[derive(Debug, Clone)]
pub enum Indicator {
    Simple(Regex),
    Composite {
        own: Regex,
        /// Must match somewhere in the text before the match.
        left: Option<Regex>,
        /// Must match somewhere in the text after the match.
        right: Option<Regex>,
    },
}

impl Indicator {
    pub fn from_record(record: &IndicatorRecord, context: &str) -> Result<Self, ConfigError> {
        match record {
            IndicatorRecord::Simple(regex) => Ok(Self::Simple(compile_regex(regex, context)?)),
            IndicatorRecord::Composite { regex, left, right } => Ok(Self::Composite {
                own: compile_regex(regex, context)?,
                left: compile_optional(left.as_deref(), context)?,
                right: compile_optional(right.as_deref(), context)?,
            }),
        }
    }

    fn own(&self) -> &Regex {
        match self {
            Self::Simple(own) | Self::Composite { own, .. } => own,
        }
    }

    fn accepts(&self, text: &str, span: Span) -> bool {
        match self {
            Self::Simple(_) => true,
            Self::Composite { left, right, .. } => {
                left.as_ref().is_none_or(|re| re.is_match(&text[..span.0]))
                    && right.as_ref().is_none_or(|re| re.is_match(&text[span.1..]))
            }
        }
    }

    /// Indicator matches in `text`, left to right.
    ///
    /// Context is checked on the non-overlapping matches of the own regex; a
    /// rejected match is not retried from a later start inside it.
    pub fn occurrences<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Span> + 'a {
        self.own()
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .filter(move |&span| self.accepts(text, span))
    }
}

/// Context under which an indicator occurrence is ignored altogether.
#[derive(Debug, Clone)]
pub struct ExceptionRule {
    left: Option<Regex>,
    own: Option<Regex>,
    right: Option<Regex>,
}

impl ExceptionRule {
    pub fn from_record(
        record: &ExceptionRecord,
        context: &str,
        index: usize,
    ) -> Result<Self, ConfigError> {
        if record.left.is_none() && record.own.is_none() && record.right.is_none() {
            return Err(ConfigError::EmptyException {
                context: context.to_string(),
                index,
            });
        }
        Ok(Self {
            left: compile_optional(record.left.as_deref(), context)?,
            own: compile_optional(record.own.as_deref(), context)?,
            right: compile_optional(record.right.as_deref(), context)?,
        })
    }

    /// True when every configured part matches around `span`.
    pub fn applies(&self, text: &str, span: Span) -> bool {
        let (start, end) = span;
        self.left.as_ref().is_none_or(|re| re.is_match(&text[..start]))
            && self.own.as_ref().is_none_or(|re| re.is_match(&text[start..end]))
            && self.right.as_ref().is_none_or(|re| re.is_match(&text[end..]))
    }
}

fn compile_optional(pattern: Option<&str>, context: &str) -> Result<Option<Regex>, ConfigError> {
    pattern.map(|p| compile_regex(p, context)).transpose()
}

#[derive(Debug, Clone)]
struct RangeBorders {
    borders: AdjacentPatterns,
    separator: String,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    value: f64,
    span: Span,
}

/// Detector for a numeric attribute such as weight or volume.
#[derive(Debug, Clone)]
pub struct ValuePattern {
    name: String,
    /// Without an indicator the pattern never fires.
    indicator: Option<Indicator>,
    multiplier: f64,
    min_value: f64,
    max_value: f64,
    multiplicity: f64,
    prefix: String,
    suffix: String,
    addends: AdjacentPatterns,
    multipliers: AdjacentPatterns,
    range: Option<RangeBorders>,
    exceptions: Vec<ExceptionRule>,
    search_order: SearchOrder,
    format: ValueFormat,
}

impl ValuePattern {
    /// Create a pattern with default settings around an indicator regex.
    pub fn new(name: impl Into<String>, indicator: Indicator) -> Self {
        Self {
            name: name.into(),
            indicator: Some(indicator),
            multiplier: 1.0,
            min_value: 0.0,
            max_value: f64::INFINITY,
            multiplicity: 0.0,
            prefix: String::new(),
            suffix: String::new(),
            addends: AdjacentPatterns::default(),
            multipliers: AdjacentPatterns::default(),
            range: None,
            exceptions: Vec::new(),
            search_order: SearchOrder::Straight,
            format: ValueFormat::default(),
        }
    }

    /// Compile a configuration record.
    pub fn from_record(record: &ValueRecord, context: &str) -> Result<Self, ConfigError> {
        let name = record.name.clone().unwrap_or_else(|| context.to_string());

        let max_value = record.max_value.unwrap_or(f64::INFINITY);
        if record.min_value > max_value {
            return Err(ConfigError::invalid(
                format!("{name}.min_value"),
                format!("{} is greater than max_value {}", record.min_value, max_value),
            ));
        }
        if record.multiplicity < 0.0 {
            return Err(ConfigError::invalid(
                format!("{name}.multiplicity"),
                "must not be negative",
            ));
        }

        let indicator = match &record.indicator {
            Some(indicator) => Some(Indicator::from_record(indicator, &name)?),
            None => {
                warn!("Value pattern {} has no indicator and will never match", name);
                None
            }
        };

        let adjacent = |record: Option<&AdjacentRecord>, what: &str| {
            record
                .map(|r| AdjacentPatterns::from_record(r, &format!("{name}.{what}")))
                .transpose()
                .map(Option::unwrap_or_default)
        };

        let range = match &record.range {
            Some(range) => Some(RangeBorders {
                borders: AdjacentPatterns::from_record(&range.borders, &format!("{name}.range"))?,
                separator: range.separator.clone(),
            }),
            None => None,
        };

        let exceptions = record
            .exceptions
            .iter()
            .enumerate()
            .map(|(index, e)| ExceptionRule::from_record(e, &name, index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            addends: adjacent(record.addends.as_ref(), "addends")?,
            multipliers: adjacent(record.multipliers.as_ref(), "multipliers")?,
            name,
            indicator,
            multiplier: record.multiplier,
            min_value: record.min_value,
            max_value,
            multiplicity: record.multiplicity,
            prefix: record.prefix.clone(),
            suffix: record.suffix.clone(),
            range,
            exceptions,
            search_order: record.search_order,
            format: record.format,
        })
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_bounds(mut self, min_value: f64, max_value: f64) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    pub fn with_multiplicity(mut self, multiplicity: f64) -> Self {
        self.multiplicity = multiplicity;
        self
    }

    pub fn with_affixes(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.suffix = suffix.into();
        self
    }

    pub fn with_addends(mut self, addends: AdjacentPatterns) -> Self {
        self.addends = addends;
        self
    }

    pub fn with_multipliers(mut self, multipliers: AdjacentPatterns) -> Self {
        self.multipliers = multipliers;
        self
    }

    pub fn with_range(mut self, borders: AdjacentPatterns, separator: impl Into<String>) -> Self {
        self.range = Some(RangeBorders {
            borders,
            separator: separator.into(),
        });
        self
    }

    pub fn with_exception(mut self, exception: ExceptionRule) -> Self {
        self.exceptions.push(exception);
        self
    }

    pub fn with_search_order(mut self, order: SearchOrder) -> Self {
        self.search_order = order;
        self
    }

    pub fn with_format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }

    /// Adjusted and validated value of one indicator occurrence.
    ///
    /// `None` means the occurrence is excepted, holds no number, or fails
    /// the bound or multiplicity check.
    fn evaluate(&self, text: &str, span: Span) -> Option<f64> {
        if self.exceptions.iter().any(|e| e.applies(text, span)) {
            trace!("{}: occurrence {:?} excepted", self.name, span);
            return None;
        }

        let (number, _) = parse_number(&text[span.0..span.1])?;
        let addend = self.addends.find(text, span).unwrap_or(0.0);
        let value = (number + addend) * self.factor(text, span);

        if self.is_valid(value) {
            Some(value)
        } else {
            trace!("{}: value {} at {:?} rejected", self.name, value, span);
            None
        }
    }

    /// Static multiplier times the dynamic one found next to `span`.
    fn factor(&self, text: &str, span: Span) -> f64 {
        self.multiplier * self.multipliers.find(text, span).unwrap_or(1.0)
    }

    fn is_valid(&self, value: f64) -> bool {
        if !(value >= self.min_value && value <= self.max_value) {
            return false;
        }
        self.multiplicity <= 0.0 || is_multiple(value, self.multiplicity)
    }

    fn select(&self, text: &str, indicator: &Indicator) -> Option<(Candidate, bool)> {
        let mut candidates = indicator
            .occurrences(text)
            .filter_map(|span| self.evaluate(text, span).map(|value| Candidate { value, span }));

        match self.search_order {
            SearchOrder::Straight => candidates.next().map(|c| (c, true)),
            SearchOrder::Reverse => candidates.last().map(|c| (c, true)),
            SearchOrder::Max => first_extreme(candidates, |a, b| a > b).map(|c| (c, true)),
            SearchOrder::Min => first_extreme(candidates, |a, b| a < b).map(|c| (c, true)),
            SearchOrder::Sum => {
                let first = candidates.next()?;
                let value = candidates.fold(first.value, |sum, c| sum + c.value);
                (value > 0.0).then_some((
                    Candidate {
                        value,
                        span: first.span,
                    },
                    false,
                ))
            }
        }
    }

    fn render(&self, text: &str, candidate: Candidate, with_range: bool) -> String {
        let range = self
            .range
            .as_ref()
            .filter(|_| with_range)
            .and_then(|range| {
                let other = range.borders.find(text, candidate.span)? * self.factor(text, candidate.span);
                let (low, high) = ordered_pair(candidate.value, other)?;
                Some(format!(
                    "{}{}{}",
                    self.format.render(low),
                    range.separator,
                    self.format.render(high)
                ))
            });

        let value = range.unwrap_or_else(|| self.format.render(candidate.value));
        format!("{}{}{}", self.prefix, value, self.suffix)
    }
}

impl FeaturePattern for ValuePattern {
    fn parse(&self, text: &str) -> Option<PatternMatch> {
        let indicator = self.indicator.as_ref()?;
        let lowered = LoweredText::new(text);
        let lower = lowered.as_str();

        let (candidate, with_range) = self.select(lower, indicator)?;
        let value = self.render(lower, candidate, with_range);
        Some(PatternMatch::new(
            value,
            lowered.original_span(candidate.span),
            self.name.as_str(),
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Ascending pair, or `None` when both values are equal.
fn ordered_pair(a: f64, b: f64) -> Option<(f64, f64)> {
    if a < b {
        Some((a, b))
    } else if b < a {
        Some((b, a))
    } else {
        None
    }
}

/// First candidate for which no later one is strictly `better`.
fn first_extreme(
    candidates: impl Iterator<Item = Candidate>,
    better: impl Fn(f64, f64) -> bool,
) -> Option<Candidate> {
    candidates.fold(None, |best: Option<Candidate>, c| match best {
        Some(b) if !better(c.value, b.value) => Some(b),
        _ => Some(c),
    })
}

fn is_multiple(value: f64, step: f64) -> bool {
    let quotient = (value / step).round();
    (value - quotient * step).abs() <= 1e-9 * value.abs().max(step)
}

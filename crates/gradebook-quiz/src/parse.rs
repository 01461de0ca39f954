//! Format readers.
//!
//! Pipeline:
//!   raw &str
//!     └─ format reader        → Vec<(row, RawQuestion)>
//!          └─ RawQuestion::into_question() → NewQuestion (normalized)
//!               └─ collect()  → ParsedBank

use csv::{ReaderBuilder, StringRecord, Trim};
use gradebook_core::question::{NewQuestion, QuestionKind};
use quick_xml::{
  Reader,
  events::{BytesStart, Event},
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
  ParsedBank, RowError,
  error::{Error, Result},
};

// ─── Format-independent row ──────────────────────────────────────────────────

/// One question as written in the source document, before any checking.
#[derive(Debug, Default)]
struct RawQuestion {
  prompt:  String,
  kind:    String,
  points:  String,
  options: Vec<String>,
  answer:  String,
}

impl RawQuestion {
  fn into_question(self) -> std::result::Result<NewQuestion, String> {
    let question = NewQuestion {
      prompt:  self.prompt,
      kind:    parse_kind(&self.kind)?,
      options: self.options,
      answer:  self.answer,
      points:  parse_points(&self.points)?,
    };
    question.normalized().map_err(|e| e.to_string())
  }
}

fn parse_kind(s: &str) -> std::result::Result<QuestionKind, String> {
  let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
  match normalized.as_str() {
    "" | "mc" | "multiple_choice" => Ok(QuestionKind::MultipleChoice),
    "tf" | "true_false" => Ok(QuestionKind::TrueFalse),
    "short" | "short_answer" => Ok(QuestionKind::ShortAnswer),
    _ => Err(format!("Unknown question type {:?}", s.trim())),
  }
}

/// Blank means one point.
fn parse_points(s: &str) -> std::result::Result<f64, String> {
  let s = s.trim();
  if s.is_empty() {
    return Ok(1.0);
  }
  s.parse::<f64>()
    .map_err(|_| format!("Invalid points value {s:?}"))
}

fn collect(
  rows: impl IntoIterator<Item = (usize, std::result::Result<RawQuestion, String>)>,
) -> ParsedBank {
  let mut bank = ParsedBank::default();
  for (row, raw) in rows {
    match raw.and_then(RawQuestion::into_question) {
      Ok(q) => bank.questions.push(q),
      Err(reason) => bank.errors.push(RowError { row, reason }),
    }
  }
  bank
}

// ─── CSV ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
  question: String,
  #[serde(rename = "type")]
  kind:     String,
  points:   String,
  option_a: String,
  option_b: String,
  option_c: String,
  option_d: String,
  answer:   String,
}

impl From<CsvRow> for RawQuestion {
  fn from(row: CsvRow) -> Self {
    Self {
      prompt:  row.question,
      kind:    row.kind,
      points:  row.points,
      options: vec![row.option_a, row.option_b, row.option_c, row.option_d],
      answer:  row.answer,
    }
  }
}

pub(crate) fn parse_csv(input: &str) -> Result<ParsedBank> {
  let mut reader = ReaderBuilder::new()
    .flexible(true)
    .trim(Trim::All)
    .from_reader(input.as_bytes());

  // Header names are matched case-insensitively.
  let headers: StringRecord = reader
    .headers()?
    .iter()
    .map(|h| h.trim().to_ascii_lowercase())
    .collect();
  for required in ["question", "answer"] {
    if !headers.iter().any(|h| h == required) {
      return Err(Error::MissingColumn(required));
    }
  }
  reader.set_headers(headers);

  let rows = reader
    .deserialize::<CsvRow>()
    .enumerate()
    .map(|(i, record)| {
      (i + 1, record.map(RawQuestion::from).map_err(|e| e.to_string()))
    })
    .collect::<Vec<_>>();
  Ok(collect(rows))
}

// ─── JSON ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct JsonQuestion {
  #[serde(default, alias = "prompt")]
  question: String,
  #[serde(default, rename = "type")]
  kind:     Option<String>,
  #[serde(default)]
  points:   Value,
  #[serde(default)]
  options:  Vec<String>,
  #[serde(default)]
  answer:   Value,
}

/// Render a scalar JSON value as the text a CSV cell would hold.
fn scalar_text(value: Value) -> std::result::Result<String, String> {
  match value {
    Value::Null => Ok(String::new()),
    Value::String(s) => Ok(s),
    Value::Bool(b) => Ok(b.to_string()),
    Value::Number(n) => Ok(n.to_string()),
    other => Err(format!("Expected a scalar value, found {other}")),
  }
}

impl TryFrom<JsonQuestion> for RawQuestion {
  type Error = String;

  fn try_from(q: JsonQuestion) -> std::result::Result<Self, String> {
    Ok(Self {
      prompt:  q.question,
      kind:    q.kind.unwrap_or_default(),
      points:  scalar_text(q.points)?,
      options: q.options,
      answer:  scalar_text(q.answer)?,
    })
  }
}

pub(crate) fn parse_json(input: &str) -> Result<ParsedBank> {
  let items: Vec<Value> = serde_json::from_str(input)?;
  let rows = items.into_iter().enumerate().map(|(i, item)| {
    let raw = serde_json::from_value::<JsonQuestion>(item)
      .map_err(|e| e.to_string())
      .and_then(RawQuestion::try_from);
    (i + 1, raw)
  });
  Ok(collect(rows))
}

// ─── XML ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Field {
  Text,
  Option,
  Answer,
}

fn xml_err(e: impl std::fmt::Display) -> Error { Error::Xml(e.to_string()) }

/// Start a question from its `type` and `points` attributes.
fn question_attrs(e: &BytesStart<'_>) -> Result<RawQuestion> {
  let mut raw = RawQuestion::default();
  for attr in e.attributes() {
    let attr = attr.map_err(xml_err)?;
    let value = attr.unescape_value().map_err(xml_err)?.into_owned();
    match attr.key.local_name().as_ref() {
      b"type" => raw.kind = value,
      b"points" => raw.points = value,
      _ => {}
    }
  }
  Ok(raw)
}

pub(crate) fn parse_xml(input: &str) -> Result<ParsedBank> {
  let mut reader = Reader::from_str(input);
  reader.config_mut().trim_text(true);

  let mut rows = Vec::new();
  let mut current: Option<RawQuestion> = None;
  let mut field: Option<Field> = None;
  let mut buf = String::new();

  loop {
    match reader.read_event().map_err(xml_err)? {
      Event::Start(ref e) | Event::Empty(ref e)
        if current.is_some() && e.local_name().as_ref() == b"question" =>
      {
        return Err(Error::Xml(format!(
          "<question> nested inside question {}",
          rows.len() + 1
        )));
      }
      Event::Start(ref e) if e.local_name().as_ref() == b"question" => {
        current = Some(question_attrs(e)?);
      }
      Event::Empty(ref e) if e.local_name().as_ref() == b"question" => {
        rows.push((rows.len() + 1, Ok(question_attrs(e)?)));
      }
      Event::Start(ref e) if current.is_some() => {
        buf.clear();
        field = match e.local_name().as_ref() {
          b"text" => Some(Field::Text),
          b"option" => Some(Field::Option),
          b"answer" => Some(Field::Answer),
          _ => None,
        };
      }
      Event::Empty(ref e) if current.is_some() => {
        // `<option/>` still occupies a lettered slot.
        if let (Some(raw), b"option") =
          (current.as_mut(), e.local_name().as_ref())
        {
          raw.options.push(String::new());
        }
      }
      Event::Text(ref e) if field.is_some() => {
        buf.push_str(&e.unescape().map_err(xml_err)?);
      }
      Event::CData(e) if field.is_some() => {
        buf.push_str(&String::from_utf8_lossy(&e.into_inner()));
      }
      Event::End(ref e) => {
        let name = e.local_name();
        match (name.as_ref(), field.take(), current.as_mut()) {
          (b"question", _, _) => {
            if let Some(raw) = current.take() {
              rows.push((rows.len() + 1, Ok(raw)));
            }
          }
          (_, Some(f), Some(raw)) => {
            let text = std::mem::take(&mut buf);
            match f {
              Field::Text => raw.prompt = text,
              Field::Option => raw.options.push(text),
              Field::Answer => raw.answer = text,
            }
          }
          _ => {}
        }
      }
      Event::Eof => break,
      _ => {}
    }
  }

  if current.is_some() {
    return Err(Error::Xml("unterminated <question> element".into()));
  }
  Ok(collect(rows))
}

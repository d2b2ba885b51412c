//! Prompt templates sent to the CLI.

use chrono::NaiveDateTime;

use super::{Language, TimeOfDay};

/// Output contract shared by both search modes.
pub const SEARCH_SCHEMA: &str = r#"{"query": string, "summary": string, "candidates": [{"score": number, "why": string, "block": object}]}"#;

fn format_now(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%d %H:%M").to_string()
}

/// First-turn cheer prompt: persona, current time, and the ban on
/// "stop working" advice.
#[must_use]
pub fn cheer_first_turn(language: Language, now: NaiveDateTime) -> String {
    let datetime = format_now(now);
    let period = TimeOfDay::at(now).label(language);
    match language {
        Language::Ja => format!(
            "あなたはかわいいアニメ女の子。開発者のそばでずっと見守りながら応援している。100文字程度で1つ応援して。現在: {datetime}（{period}）。禁止: 「早く寝て」「休んで」など作業を止めさせる応援。"
        ),
        Language::En => format!(
            "You're a cute anime girl always by the developer's side, watching and cheering them on. Give one encouragement (~30 words). Now: {datetime} ({period}). Never say 'go to sleep' or 'take a break' - always encourage working."
        ),
    }
}

/// Short cue for a resumed cheer session.
#[must_use]
pub fn cheer_continuation(language: Language, now: NaiveDateTime) -> String {
    let datetime = format_now(now);
    let period = TimeOfDay::at(now).label(language);
    match language {
        Language::Ja => format!("次（{period}、{datetime}）"),
        Language::En => format!("Next ({period}, {datetime})"),
    }
}

/// Search over records supplied inline.
#[must_use]
pub fn search(query: &str, records: &[serde_json::Value]) -> String {
    let blocks = serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string());
    format!(
        "You are a strict JSON generator. Output JSON only (no markdown).
Return an object: {SEARCH_SCHEMA}.
Rules:
- Always respond.
- candidates must be an array (possibly empty).
- Each candidate.block must be EXACTLY one element from the provided Blocks array (verbatim copy). Do not invent ids or edit text.
- If none match, return candidates: [] and a short summary.

Query: {query}

Blocks (JSON array):
{blocks}"
    )
}

/// Search over generic JSONL history files under a folder.
#[must_use]
pub fn deep_search(query: &str, folder: &str) -> String {
    format!(
        "You can read files. Search JSONL/NDJSON history under the folder below.
Each line is a JSON object. Prefer entries that look like a terminal history block with fields such as: id, input, output_text, created_at, pane_id, session_id.
Return JSON only with schema: {SEARCH_SCHEMA}.
Rules:
- Only include blocks that exist in the files.
- candidate.block should include at least: id, input (or inputs), output_text, created_at (or timestamp), pane_id, session_id.
- If nothing matches, return candidates: [] with a short summary.

Folder: {folder}
Query: {query}"
    )
}

/// Search over Claude Code conversation logs under a folder.
#[must_use]
pub fn claude_deep_search(query: &str, folder: &str, project_path: &str) -> String {
    format!(
        r#"You can read files. Search Claude Code JSONL logs under the folder below.
Log format:
- Each file is .jsonl (one JSON object per line).
- Main conversation entries have: {{"type":"user"|"assistant", "isSidechain":false, "uuid":..., "sessionId":..., "timestamp":..., "message":{{...}}}}.
- Ignore entries where isSidechain is true and ignore subagents logs.
- For user entries: message.role == "user" and message.content contains the prompt text (string or array).
- For assistant entries: message.role == "assistant" and message.content is an array; collect only content blocks with type=="text" (ignore thinking/tool_use).
Reconstruct blocks:
- Start a new block when you see a user entry.
- A block includes the user prompt and the following assistant text entries until the next user entry.
Return JSON only with schema: {SEARCH_SCHEMA}.
Rules:
- Only include blocks that exist in the files.
- candidate.block must be directly displayable and include at least:
  - id (use user uuid)
  - pane_id (use the provided project_path)
  - pane_label (use "Claude")
  - session_id (use sessionId)
  - input (user prompt text)
  - inputs (optional, array of prompts)
  - output_text (assistant text)
  - created_at (timestamp; keep as ISO string if unsure)
  - last_output_at (timestamp; keep as ISO string if unsure)
- If nothing matches, return candidates: [] with a short summary.

Folder: {folder}
project_path: {project_path}
Query: {query}"#
    )
}

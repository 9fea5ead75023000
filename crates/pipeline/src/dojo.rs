//! C10: expert-in-the-loop knowledge ingestion. The only path that
//! populates the knowledge retriever C2 uses.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tesla_copilot_core::{DojoResponseType, DojoTurn, Error, KnowledgeNugget, KnowledgeType, Result, Retriever};
use tesla_copilot_llm::LlmGateway;

const SYSTEM_PROMPT: &str = r#"You are a knowledge-intake interviewer for a sales-strategy system. An expert is describing a piece of sales knowledge to you across a conversation.

A complete knowledge nugget needs: content (the knowledge itself), title (a short label), and type (one of: general, objection, closing, product, pricing, competition, demo, follow_up, technical).

If any of those three are still missing or unclear from the conversation so far, respond with a single JSON object: {"type": "question", "text": "<one clarifying question>"}.

Once content, title, and type can all be inferred, respond with: {"type": "proposal", "content": "...", "title": "...", "knowledge_type": "...", "archetype": "<archetype key or null>", "summary": "<one sentence asking the expert to confirm>"}.

Respond with a single JSON object and nothing else."#;

#[derive(Default, Clone)]
struct Draft {
    content: Option<String>,
    title: Option<String>,
    kind: Option<KnowledgeType>,
    archetype: Option<String>,
}

impl Draft {
    fn is_complete(&self) -> bool {
        self.content.is_some() && self.title.is_some() && self.kind.is_some()
    }

    fn into_nugget(self, source: String) -> Option<KnowledgeNugget> {
        Some(KnowledgeNugget {
            id: uuid::Uuid::new_v4().to_string(),
            content: self.content?,
            title: self.title?,
            kind: self.kind?,
            archetype: self.archetype,
            tags: Vec::new(),
            source,
            created_at: chrono::Utc::now(),
            embedding_vector: Vec::new(),
        })
    }
}

struct DojoSession {
    transcript: Vec<String>,
    draft: Draft,
}

pub struct DojoChannel {
    gateway: Arc<LlmGateway>,
    retriever: Arc<dyn Retriever>,
    sessions: RwLock<HashMap<String, DojoSession>>,
}

fn parse_knowledge_type(s: &str) -> Option<KnowledgeType> {
    match s {
        "general" => Some(KnowledgeType::General),
        "objection" => Some(KnowledgeType::Objection),
        "closing" => Some(KnowledgeType::Closing),
        "product" => Some(KnowledgeType::Product),
        "pricing" => Some(KnowledgeType::Pricing),
        "competition" => Some(KnowledgeType::Competition),
        "demo" => Some(KnowledgeType::Demo),
        "follow_up" => Some(KnowledgeType::FollowUp),
        "technical" => Some(KnowledgeType::Technical),
        _ => None,
    }
}

impl DojoChannel {
    pub fn new(gateway: Arc<LlmGateway>, retriever: Arc<dyn Retriever>) -> Self {
        Self { gateway, retriever, sessions: RwLock::new(HashMap::new()) }
    }

    pub async fn chat(
        &self,
        dojo_session_id: Option<String>,
        expert_message: &str,
        training_mode: &str,
        client_context: Option<&str>,
    ) -> DojoTurn {
        let session_id = {
            let mut sessions = self.sessions.write();
            let id = dojo_session_id
                .filter(|id| sessions.contains_key(id))
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            sessions.entry(id.clone()).or_insert_with(|| DojoSession { transcript: Vec::new(), draft: Draft::default() });
            id
        };

        {
            let mut sessions = self.sessions.write();
            if let Some(session) = sessions.get_mut(&session_id) {
                session.transcript.push(format!("expert: {expert_message}"));
            }
        }

        let transcript = {
            let sessions = self.sessions.read();
            sessions.get(&session_id).map(|s| s.transcript.join("\n")).unwrap_or_default()
        };

        let mut user_prompt = format!("Training mode: {training_mode}\n\nConversation so far:\n{transcript}");
        if let Some(context) = client_context {
            user_prompt.push_str(&format!("\n\nClient context: {context}"));
        }

        let completion = match self.gateway.generate(SYSTEM_PROMPT, &user_prompt, "dojo", false).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "dojo chat failed: llm call failed");
                return self.error_turn(session_id);
            }
        };

        let value = match tesla_copilot_core::parse_outermost_json::<Value>(&completion.content) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "dojo chat failed: unparsable response");
                return self.error_turn(session_id);
            }
        };

        match value.get("type").and_then(Value::as_str) {
            Some("question") => {
                let text = value.get("text").and_then(Value::as_str).unwrap_or("Could you tell me more?").to_string();
                DojoTurn {
                    dojo_session_id: session_id,
                    response_text: text,
                    response_type: DojoResponseType::Question,
                    proposed_nugget: None,
                    confidence_level: 50,
                }
            }
            Some("proposal") => self.handle_proposal(session_id, &value),
            _ => self.error_turn(session_id),
        }
    }

    fn handle_proposal(&self, session_id: String, value: &Value) -> DojoTurn {
        let content = value.get("content").and_then(Value::as_str).map(str::to_string);
        let title = value.get("title").and_then(Value::as_str).map(str::to_string);
        let kind = value.get("knowledge_type").and_then(Value::as_str).and_then(parse_knowledge_type);
        let archetype = value.get("archetype").and_then(Value::as_str).map(str::to_string);

        if content.is_none() || title.is_none() || kind.is_none() {
            return self.error_turn(session_id);
        }

        let draft = Draft { content, title, kind, archetype };
        let summary = value
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or("Here's what I captured — should I save it?")
            .to_string();

        let proposed_nugget = draft.clone().into_nugget("dojo".to_string());
        {
            let mut sessions = self.sessions.write();
            if let Some(session) = sessions.get_mut(&session_id) {
                session.draft = draft;
            }
        }

        DojoTurn {
            dojo_session_id: session_id,
            response_text: summary,
            response_type: DojoResponseType::Confirmation,
            proposed_nugget,
            confidence_level: 70,
        }
    }

    fn error_turn(&self, session_id: String) -> DojoTurn {
        DojoTurn {
            dojo_session_id: session_id,
            response_text: "Something went wrong processing that — could you rephrase?".to_string(),
            response_type: DojoResponseType::Error,
            proposed_nugget: None,
            confidence_level: 0,
        }
    }

    pub async fn confirm(&self, dojo_session_id: &str, confirmed: bool) -> Result<Option<String>> {
        let draft = {
            let sessions = self.sessions.read();
            let session = sessions
                .get(dojo_session_id)
                .ok_or_else(|| Error::DojoSessionNotFound(dojo_session_id.to_string()))?;
            session.draft.clone()
        };

        if !confirmed {
            if let Some(session) = self.sessions.write().get_mut(dojo_session_id) {
                session.draft = Draft::default();
            }
            return Ok(None);
        }

        if !draft.is_complete() {
            return Ok(None);
        }

        let Some(nugget) = draft.into_nugget("dojo".to_string()) else {
            return Ok(None);
        };
        let created_ids = self.retriever.bulk_upsert(vec![nugget]).await?;
        self.sessions.write().remove(dojo_session_id);
        Ok(created_ids.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_contracted_knowledge_type() {
        assert_eq!(parse_knowledge_type("objection"), Some(KnowledgeType::Objection));
        assert_eq!(parse_knowledge_type("follow_up"), Some(KnowledgeType::FollowUp));
        assert_eq!(parse_knowledge_type("not_a_type"), None);
    }

    #[test]
    fn incomplete_draft_is_not_complete() {
        let draft = Draft { content: Some("x".into()), title: None, kind: None, archetype: None };
        assert!(!draft.is_complete());
    }
}

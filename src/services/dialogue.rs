use std::sync::Arc;

use crate::db::queries;
use crate::models::{BookingDate, DialogueStep, Slot};
use crate::services::availability::{self, SlotError};
use crate::services::dates;
use crate::state::AppState;

const DATE_PROMPT: &str =
    "📅 Informe o dia e mês do seu agendamento (formato Mês Dia, ex: Janeiro 15).";
const IDLE_HINT: &str = "Não entendi. 🤔 Digite \"menu\" para ver as opções.";
const TIME_HINT: &str = "❌ Opção inválida. Responda com a letra de um dos horários listados (ex: A).";
const NAME_HINT: &str = "❌ Nome muito curto. Por favor, informe seu nome completo.";
const RETRY_LATER: &str =
    "⚠️ Estamos com uma instabilidade no momento. Por favor, tente novamente em instantes.";

/// Runs one inbound message through the dialogue state machine and returns
/// the reply text. Session transitions happen here; delivery of the reply
/// is the caller's problem.
pub async fn process_message(
    state: &Arc<AppState>,
    chat_id: &str,
    body: &str,
) -> anyhow::Result<String> {
    let text = body.trim();

    // The greeting always wins, even mid-flow: it resets the session and
    // shows the menu.
    if state.profile.is_greeting(text) {
        state.sessions.reset(chat_id);
        return Ok(menu_text(state));
    }

    // Fixed informational options answer from any step and leave the
    // session untouched.
    if let Some(reply) = info_reply(state, text) {
        return Ok(reply);
    }

    let step = state.sessions.get(chat_id);

    tracing::info!(chat = %chat_id, step = step.as_str(), "processing message");

    let reply = match step {
        DialogueStep::Idle => handle_idle(state, chat_id, text),
        DialogueStep::AwaitingDate => handle_date(state, chat_id, text),
        DialogueStep::AwaitingTime { date } => handle_time(state, chat_id, text, date),
        DialogueStep::AwaitingName { date, time } => {
            handle_name(state, chat_id, text, date, time).await
        }
    };

    Ok(reply)
}

// ── Step handlers ──

fn handle_idle(state: &Arc<AppState>, chat_id: &str, text: &str) -> String {
    if text == "1" {
        state.sessions.set(chat_id, DialogueStep::AwaitingDate);
        return DATE_PROMPT.to_string();
    }
    IDLE_HINT.to_string()
}

fn handle_date(state: &Arc<AppState>, chat_id: &str, text: &str) -> String {
    let today = chrono::Local::now().date_naive();

    let date = match dates::validate(text, &state.profile.months, today) {
        Ok(date) => date,
        // Rejected input re-prompts without leaving the date step
        Err(e) => return e.to_string(),
    };

    let free = {
        let db = state.db.lock().unwrap();
        availability::free_slots(&db, &state.profile.catalog, &date.key)
    };

    let free = match free {
        Ok(free) => free,
        Err(e) => return reply_for_slot_error(&e, &date.key),
    };

    if free.is_empty() {
        // Stay on the date step so the next message can try another date
        return all_taken_text(&date.key);
    }

    tracing::info!(chat = %chat_id, date = %date.key, resolved = %date.day, "date accepted");

    let reply = slot_list_text(&free);
    state.sessions.set(chat_id, DialogueStep::AwaitingTime { date });
    reply
}

fn handle_time(state: &Arc<AppState>, chat_id: &str, text: &str, date: BookingDate) -> String {
    let label = match parse_label(text) {
        Some(label) if state.profile.catalog.contains(label) => label,
        _ => return TIME_HINT.to_string(),
    };

    // Availability is re-checked at selection time; the definitive claim
    // still happens at the final step.
    let checked = {
        let db = state.db.lock().unwrap();
        availability::ensure_free(&db, &state.profile.catalog, &date.key, label)
    };

    match checked {
        Ok(slot) => {
            let reply = format!(
                "✅ Horário {} selecionado! Agora, por favor, informe seu nome completo.",
                slot.time
            );
            state.sessions.set(
                chat_id,
                DialogueStep::AwaitingName {
                    date,
                    time: slot.time,
                },
            );
            reply
        }
        Err(e) => reply_for_slot_error(&e, &date.key),
    }
}

async fn handle_name(
    state: &Arc<AppState>,
    chat_id: &str,
    text: &str,
    date: BookingDate,
    time: String,
) -> String {
    if text.chars().count() <= 1 {
        return NAME_HINT.to_string();
    }
    let name = text;

    let claimed = {
        let db = state.db.lock().unwrap();
        queries::claim_slot(&db, name, &time, &date.key)
    };

    match claimed {
        Err(e) => {
            tracing::error!(error = %e, chat = %chat_id, "booking insert failed");
            // The user keeps the name step; success is never implied on a
            // failed write.
            RETRY_LATER.to_string()
        }
        Ok(false) => lost_claim_reply(state, chat_id, date, &time),
        Ok(true) => {
            tracing::info!(chat = %chat_id, date = %date.key, time = %time, "booking registered");

            let operator_note = format!(
                "📅 Novo agendamento:\n\n👤 Nome: {name}\n🕒 Data: {} às {time}\n\nStatus: Pendente",
                date.key
            );
            notify_operator(state, &operator_note).await;

            let reply = format!(
                "✅ Seu agendamento foi registrado com sucesso!\n\n🕒 Data: {} às {time}\n👤 Nome: {name}\n\nDigite \"menu\" para voltar ao início.",
                date.key
            );
            state.sessions.delete(chat_id);
            reply
        }
    }
}

/// The claim lost: somebody else landed on the slot between selection and
/// confirmation. Send the user back to pick again from fresh data.
fn lost_claim_reply(
    state: &Arc<AppState>,
    chat_id: &str,
    date: BookingDate,
    time: &str,
) -> String {
    let taken = format!("❌ O horário {time} acabou de ser reservado por outro cliente. ");

    let free = {
        let db = state.db.lock().unwrap();
        availability::free_slots(&db, &state.profile.catalog, &date.key)
    };

    match free {
        Ok(free) if free.is_empty() => {
            let reply = format!("{taken}{}", all_taken_text(&date.key));
            state.sessions.set(chat_id, DialogueStep::AwaitingDate);
            reply
        }
        Ok(free) => {
            let reply = format!("{taken}{}", slot_list_text(&free));
            state.sessions.set(chat_id, DialogueStep::AwaitingTime { date });
            reply
        }
        Err(e) => {
            if let SlotError::StorageUnavailable(cause) = &e {
                tracing::error!(error = %cause, "availability refresh failed after lost claim");
            }
            let reply = format!("{taken}Escolha outro horário.");
            state.sessions.set(chat_id, DialogueStep::AwaitingTime { date });
            reply
        }
    }
}

// ── Reply builders ──

fn menu_text(state: &Arc<AppState>) -> String {
    format!(
        "Olá! Sou o assistente virtual da {}. Escolha uma opção:\n\n1️⃣ Agendar Horário\n2️⃣ Promoções\n3️⃣ Endereço e Contato\n4️⃣ Cancelar Agendamento\n5️⃣ Perguntas Frequentes",
        state.profile.business_name
    )
}

fn info_reply(state: &Arc<AppState>, text: &str) -> Option<String> {
    let reply = match text {
        "2" => &state.profile.promotions_text,
        "3" => &state.profile.address_text,
        "4" => &state.profile.cancel_text,
        "5" => &state.profile.faq_text,
        _ => return None,
    };
    Some(reply.clone())
}

fn slot_list_text(free: &[Slot]) -> String {
    let mut message = String::from("✅ Escolha o horário disponível:\n\n");
    for slot in free {
        message.push_str(&format!("🕒 {}: {}\n", slot.label, slot.time));
    }
    message
}

fn all_taken_text(date_key: &str) -> String {
    format!(
        "❌ Todos os horários estão ocupados para a data {date_key}. Por favor, escolha outra data."
    )
}

fn reply_for_slot_error(e: &SlotError, date_key: &str) -> String {
    if let SlotError::StorageUnavailable(cause) = e {
        tracing::error!(error = %cause, date = %date_key, "booking storage query failed");
    }
    e.to_string()
}

fn parse_label(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let first = chars.next()?;
    if chars.next().is_some() || !first.is_ascii_alphabetic() {
        return None;
    }
    Some(first.to_ascii_uppercase())
}

async fn notify_operator(state: &Arc<AppState>, message: &str) {
    // The dev endpoint drains this queue to expose notifications in its response.
    if let Ok(mut notifications) = state.dev_notifications.lock() {
        notifications.push(message.to_string());
    }

    if state.profile.operator_chat_id.is_empty() {
        tracing::warn!("operator_chat_id not configured, skipping notification");
        return;
    }

    if let Err(e) = state
        .messaging
        .send_message(&state.profile.operator_chat_id, message)
        .await
    {
        tracing::error!(error = %e, "failed to notify operator");
    }
}

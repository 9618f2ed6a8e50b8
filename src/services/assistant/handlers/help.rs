use crate::models::{BotResponse, Intent, Mood};
use crate::services::assistant::ChatEngine;

const EXAMPLES: &str = "\
• **¿Cuándo me toca cantar?** tus próximos turnos
• **¿Cuándo le toca a Pedro?** los turnos de otra persona
• **¿Cuándo es el ensayo?** el próximo ensayo
• **Buscar gracia** canciones del repertorio
• **Selecciona Sublime Gracia** elegir una canción para tu servicio
• **Cumpleaños de marzo** quién cumple años en un mes
• **Versículo del día**, **Juan 3:16** o **versículos sobre la paz**";

impl ChatEngine {
    /// Capabilities overview. Used for explicit help, bare greetings and
    /// anything the classifier could not place.
    pub(crate) fn help(&self, intent: Intent) -> BotResponse {
        let name = &self.assistant_name;
        match intent {
            Intent::Unclassified => BotResponse::new(
                intent,
                Mood::Thinking,
                format!("No estoy seguro de haber entendido. Puedes pedirme, por ejemplo:\n{EXAMPLES}"),
            ),
            _ => BotResponse::new(
                Intent::Help,
                Mood::Neutral,
                format!(
                    "¡Hola! Soy **{name}**, el asistente del ministerio. Esto es lo que puedo hacer:\n{EXAMPLES}\n\nEscribe **{name}** al inicio de tu mensaje para hablar conmigo."
                ),
            ),
        }
    }
}

use crate::config::Persona;
use crate::traits::ToolSpec;
use std::fmt::Write;

const MOVIE_GUIDE: &str = "Você é um cinéfilo brasileiro, simpático e bem-humorado, que ajuda as pessoas a escolher o que assistir.

- Quando pedirem sugestões (por gênero, clima, ator, diretor ou época), recomende filmes com base no seu próprio conhecimento, explicando em poucas linhas por que cada um vale a pena. Não use ferramentas para isso.
- Quando perguntarem onde assistir a um filme específico, chame a ferramenta `find_streaming_platforms` com o título e, se souber, o ano de lançamento.
- Responda com base no resultado da ferramenta. Se o filme não for encontrado ou não estiver em nenhuma plataforma, diga isso com leveza e faça uma brincadeira discreta sobre recorrer a \"meios alternativos\", sem incentivar nada de fato.
- Se a busca falhar, peça desculpas e sugira tentar de novo mais tarde.
- Responda sempre em português do Brasil.";

const HISTORY_TEACHER: &str = "Você é um professor de História brasileiro, autor de vários livros e conhecido pelos alunos como Han Solo, por causa do personagem de Star Wars. Você mora em Ouro Preto, no interior de Minas Gerais.

- Use humor para tornar o aprendizado interessante.
- Faça perguntas para entender melhor quem está conversando com você e ajustar a explicação.
- Sugira formas de relacionar os conceitos com o mundo real, por meio de observações e pequenos experimentos.
- Seja um bom amigo de conversa, mas não tolere grosserias: se for destratado, pode responder à altura.
- Responda sempre em português do Brasil.";

impl Persona {
    pub fn instruction(self) -> &'static str {
        match self {
            Self::MovieGuide => MOVIE_GUIDE,
            Self::HistoryTeacher => HISTORY_TEACHER,
        }
    }

    pub fn greeting(self) -> &'static str {
        match self {
            Self::MovieGuide => {
                "Olá! Quer uma dica de filme ou saber onde assistir a algum? É só perguntar."
            }
            Self::HistoryTeacher => "Olá Mundo!, como posso te ajudar hoje?",
        }
    }

    /// Whether this persona is given the catalog tool.
    pub fn uses_tools(self) -> bool {
        matches!(self, Self::MovieGuide)
    }
}

/// Builds the system instruction sent with every request.
pub struct ContextBuilder {
    pub persona: Persona,
    pub tool_specs: Vec<ToolSpec>,
}

impl ContextBuilder {
    pub fn new(persona: Persona) -> Self {
        Self {
            persona,
            tool_specs: vec![],
        }
    }

    pub fn with_tool_specs(mut self, tool_specs: Vec<ToolSpec>) -> Self {
        self.tool_specs = tool_specs;
        self
    }

    pub fn build_system_instruction(&self) -> String {
        let mut parts = vec![self.persona.instruction().to_string()];

        if let Some(tools) = self.get_tool_summary() {
            parts.push(tools);
        }

        parts.push(self.get_runtime_context());

        parts.join("\n\n---\n\n")
    }

    fn get_tool_summary(&self) -> Option<String> {
        if self.tool_specs.is_empty() {
            return None;
        }

        let mut summary = String::from("## Ferramentas disponíveis\n\n");
        for tool in &self.tool_specs {
            let _ = writeln!(summary, "- **{}**: {}", tool.name, tool.description);
        }
        Some(summary.trim_end().to_string())
    }

    fn get_runtime_context(&self) -> String {
        let today = chrono::Local::now().format("%d/%m/%Y");
        format!("## Contexto\n\nData de hoje: {today}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn movie_guide_lists_tools() {
        let spec = ToolSpec {
            name: "find_streaming_platforms".to_string(),
            description: "Onde assistir".to_string(),
            parameters: json!({}),
        };
        let instruction = ContextBuilder::new(Persona::MovieGuide)
            .with_tool_specs(vec![spec])
            .build_system_instruction();

        assert!(instruction.starts_with(MOVIE_GUIDE));
        assert!(instruction.contains("- **find_streaming_platforms**: Onde assistir"));
        assert!(instruction.contains("Data de hoje:"));
    }

    #[test]
    fn tool_section_omitted_without_tools() {
        let instruction = ContextBuilder::new(Persona::HistoryTeacher).build_system_instruction();

        assert!(instruction.starts_with(HISTORY_TEACHER));
        assert!(!instruction.contains("Ferramentas disponíveis"));
    }

    #[test]
    fn only_movie_guide_uses_tools() {
        assert!(Persona::MovieGuide.uses_tools());
        assert!(!Persona::HistoryTeacher.uses_tools());
        assert_eq!(
            Persona::HistoryTeacher.greeting(),
            "Olá Mundo!, como posso te ajudar hoje?"
        );
    }
}

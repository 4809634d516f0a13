//! Prompt construction and completion clean-up.

pub const SYSTEM_PROMPT: &str = "Você extrai dados de resumos de pedidos de delivery. \
Responda somente com um objeto JSON válido, sem texto antes ou depois.";

/// Builds the user message asking the model for the order JSON.
#[must_use]
pub fn build_extraction_prompt(summary: &str) -> String {
    format!(
        r#"Leia o resumo de pedido abaixo e devolva os dados em JSON.

RESUMO DO PEDIDO:
{summary}

Campos:
- nome: nome do cliente
- telefone: somente dígitos
- unidade: unidade/loja que atende o pedido
- produtos: lista com nome e preço de cada produto
  (mantenha o tamanho no nome, ex.: "Pizza grande Calabresa")
- endereco: endereço completo, se for entrega
- bairro: bairro de entrega, se for entrega
- taxa_entrega: valor da taxa de entrega (0 para retirada)
- valor_total: valor total do pedido
- forma_pagamento: forma de pagamento
- troco: valor para troco, se houver
- observacoes: observações do cliente
- tipo_entrega: "entrega" ou "retirada"

Formato exato:
{{
  "nome": "string",
  "telefone": "string",
  "unidade": "string",
  "produtos": [{{ "nome": "string", "preco": number }}],
  "endereco": "string ou null",
  "bairro": "string ou null",
  "taxa_entrega": number,
  "valor_total": number,
  "forma_pagamento": "string",
  "troco": number ou null,
  "observacoes": "string ou null",
  "tipo_entrega": "entrega" ou "retirada"
}}
"#
    )
}

/// Removes a surrounding Markdown code fence (```` ```json ```` or ```` ``` ````)
/// that models often wrap JSON in.
#[must_use]
pub fn strip_code_fences(content: &str) -> &str {
    let mut body = content.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

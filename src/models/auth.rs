// src/models/auth.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// As claims que esperamos dentro do JWT emitido pelo serviço de identidade.
// A emissão do token acontece fora deste serviço; aqui apenas validamos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // ID do usuário (staff)
    pub email: String,
    pub exp: usize,
}

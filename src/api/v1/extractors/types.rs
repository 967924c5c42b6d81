/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - OIDC/JWT の検証ロジックは middleware/services 側の責務
 * - ここは「型（契約）」として固定化する。stringly-keyed な context lookup はしない
 */

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `principal` はトークンの `preferred_username`（匿名時は "anonymous"）
/// - `roles` は設定されたクライアントに対する per-client role set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    pub principal: String,
    pub roles: Vec<String>,
}

pub const ANONYMOUS_PRINCIPAL: &str = "anonymous";

impl RequestIdentity {
    pub fn new(principal: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            principal: principal.into(),
            roles,
        }
    }

    /// Fixed identity injected when authentication is disabled.
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_PRINCIPAL, Vec::new())
    }
}

/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 *
 * Note
 * - Token verifier はここではなく middleware::auth::BearerAuth が所有する。
 *   handler からは見えない依存なので AppState に混ぜない。
 */
#[derive(Clone, Debug, Default)]
pub struct AppState;

impl AppState {
    pub fn new() -> Self {
        Self
    }
}

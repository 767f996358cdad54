//! Error Kind - Stable identity of failures
//!
//! Defines the [`ErrorKind`] enum (the identity every layer compares against)
//! and the [`Layer`] tag recording where an error was raised.

use serde::Serialize;

/// エラー種別の列挙体
///
/// エラーの「同一性」を表す唯一のキーです。
/// `reason()` が返す文字列は安定しており、レイヤーを跨いでも変わりません。
/// HTTP ステータスへの対応表は表示用であり、同一性の判定には使いません。
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::UserNotFound;
/// assert_eq!(kind.reason(), "user not found");
/// assert_eq!(kind.status_code(), 403);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// パスワードがポリシーを満たさない、またはハッシュ化に失敗
    InvalidPassword,
    /// 内部エラー（DB 障害、署名失敗、タイムアウトなど）
    InternalService,
    /// ユーザーが既に存在する
    UserAlreadyExists,
    /// ユーザーが見つからない
    UserNotFound,
    /// 認証情報が一致しない
    WrongCredentials,
    /// アカウントが無効化されている
    UserNotActive,
    /// トークンの署名・アルゴリズム・有効期限が不正
    InvalidToken,
    /// トークン種別がエンドポイントの要求と一致しない
    InvalidTokenType,
    /// Authorization ヘッダーが無い、または形式が不正
    JwtMissing,
    /// トークンが検証に失敗した（外部向けの統一表現）
    JwtInvalid,
    /// リクエストの内容が不正
    BadRequest,
}

impl ErrorKind {
    /// 安定した理由文字列を取得
    ///
    /// ## Returns
    /// クライアントにも返される、人が読める同一性文字列
    #[inline]
    pub const fn reason(&self) -> &'static str {
        match self {
            ErrorKind::InvalidPassword => "invalid password",
            ErrorKind::InternalService => "internal service error",
            ErrorKind::UserAlreadyExists => "user already exists",
            ErrorKind::UserNotFound => "user not found",
            ErrorKind::WrongCredentials => "wrong credentials",
            ErrorKind::UserNotActive => "user not active",
            ErrorKind::InvalidToken => "invalid token",
            ErrorKind::InvalidTokenType => "invalid token type",
            ErrorKind::JwtMissing => "missing or malformed jwt",
            ErrorKind::JwtInvalid => "invalid or expired jwt",
            ErrorKind::BadRequest => "bad request",
        }
    }

    /// HTTP ステータスコードを取得（表示用の対応表）
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::JwtMissing.status_code(), 400);
    /// assert_eq!(ErrorKind::JwtInvalid.status_code(), 401);
    /// ```
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::InvalidPassword
            | ErrorKind::UserAlreadyExists
            | ErrorKind::JwtMissing
            | ErrorKind::BadRequest => 400,
            ErrorKind::InvalidToken | ErrorKind::JwtInvalid => 401,
            ErrorKind::UserNotFound
            | ErrorKind::WrongCredentials
            | ErrorKind::UserNotActive
            | ErrorKind::InvalidTokenType => 403,
            ErrorKind::InternalService => 500,
        }
    }

    /// サーバー側のエラーかどうかを判定
    ///
    /// 5xx系のエラーは `true` を返します。
    /// これらのエラーはログに記録すべきです。
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

/// エラーが発生したアーキテクチャ上のレイヤー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// ドライバ/コネクションプール
    Database,
    /// リポジトリ
    Repo,
    /// サービス（ユースケース）
    Service,
    /// HTTP トランスポート
    Transport,
}

impl Layer {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Layer::Database => "database",
            Layer::Repo => "repo",
            Layer::Service => "service",
            Layer::Transport => "transport",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

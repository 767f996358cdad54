//! Application Error - Layered, chainable error type
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::error::Error;
use std::fmt;

use super::kind::{ErrorKind, Layer};

/// 連鎖させる元エラーの型
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// アプリケーション統一エラー型
///
/// 各レイヤー（repo / service / transport）で発生した失敗を表します。
/// 同一性は [`ErrorKind`] のみで決まり、`inner` はログ用の原因としてだけ保持します。
///
/// ## Fields
/// * `layer` - エラーを発生させたレイヤー
/// * `kind` - エラーの同一性（`reason` 文字列を決定）
/// * `status` - トランスポート層で付与される表示用ステータス（オプション）
/// * `inner` - 元のエラー（オプション、デバッグ用、クライアントには返さない）
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let repo_err = AppError::repo(ErrorKind::UserNotFound);
/// let svc_err = AppError::service(ErrorKind::UserNotFound).with_inner(repo_err);
/// assert!(svc_err.is(ErrorKind::UserNotFound));
/// ```
pub struct AppError {
    /// 発生レイヤー
    layer: Layer,
    /// エラー種別
    kind: ErrorKind,
    /// 表示用ステータスの上書き
    status: Option<u16>,
    /// 元のエラー（デバッグ用）
    inner: Option<BoxError>,
}

/// アプリケーション結果型エイリアス
///
/// `Result<T, AppError>` の省略形です。
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// 新しいエラーを作成
    ///
    /// ## Arguments
    /// * `layer` - 発生レイヤー
    /// * `kind` - エラー種別
    #[inline]
    pub fn new(layer: Layer, kind: ErrorKind) -> Self {
        Self {
            layer,
            kind,
            status: None,
            inner: None,
        }
    }

    /// リポジトリ層のエラー
    #[inline]
    pub fn repo(kind: ErrorKind) -> Self {
        Self::new(Layer::Repo, kind)
    }

    /// サービス層のエラー
    #[inline]
    pub fn service(kind: ErrorKind) -> Self {
        Self::new(Layer::Service, kind)
    }

    /// トランスポート層のエラー
    #[inline]
    pub fn transport(kind: ErrorKind) -> Self {
        Self::new(Layer::Transport, kind)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// 元のエラーを設定（デバッグ用）
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::{app_error::AppError, kind::ErrorKind};
    /// use std::error::Error;
    ///
    /// let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk");
    /// let err = AppError::service(ErrorKind::InternalService).with_inner(io_err);
    /// assert!(err.source().is_some());
    /// ```
    #[inline]
    pub fn with_inner(mut self, inner: impl Into<BoxError>) -> Self {
        self.inner = Some(inner.into());
        self
    }

    /// 表示用ステータスを上書き
    ///
    /// 同一性には影響しません。トランスポート層でのみ使用します。
    #[inline]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// 同じ layer / kind / status のまま、元のエラーだけを差し替えた複製を作成
    ///
    /// 下位レイヤーの具体的な原因を付与しつつ、比較対象となる同一性は維持します。
    pub fn clone_with_inner(&self, inner: impl Into<BoxError>) -> Self {
        Self {
            layer: self.layer,
            kind: self.kind,
            status: self.status,
            inner: Some(inner.into()),
        }
    }

    /// 外側のレイヤーで同じ種別として再送出
    ///
    /// 元のエラーは `inner` として連鎖します。
    pub fn into_layer(self, layer: Layer) -> Self {
        Self::new(layer, self.kind).with_inner(self)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// 発生レイヤーを取得
    #[inline]
    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// エラー種別を取得
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 安定した理由文字列を取得
    #[inline]
    pub fn reason(&self) -> &'static str {
        self.kind.reason()
    }

    /// HTTP ステータスコードを取得
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or_else(|| self.kind.status_code())
    }

    /// 元のエラーを取得
    #[inline]
    pub fn inner(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.inner.as_deref()
    }

    /// 指定した種別かどうか
    #[inline]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// 同じ種別のエラーかどうか（`reason` の一致で判定）
    ///
    /// レイヤー、ステータス、`inner` は比較しません。
    #[inline]
    pub fn is_same_kind(&self, other: &AppError) -> bool {
        self.reason() == other.reason()
    }

    /// サーバーエラーかどうか
    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// クライアント向けの文字列表現（`inner` を含まない）
    pub fn public_message(&self) -> String {
        format!("[{} error: ({})]", self.layer, self.reason())
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("layer", &self.layer);
        builder.field("kind", &self.kind);
        if let Some(status) = &self.status {
            builder.field("status", status);
        }
        if let Some(inner) = &self.inner {
            builder.field("inner", inner);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} error: ({})]", self.layer, self.reason())?;
        if let Some(inner) = &self.inner {
            write!(f, " -> {}", inner)?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

// ============================================================================
// Result extension traits
// ============================================================================

/// `Result<T, E>` を `AppResult<T>` に変換するための拡張トレイト
pub trait ResultExt<T, E> {
    /// エラーを指定したレイヤー・種別の `AppError` でラップ
    fn map_app_err(self, layer: Layer, kind: ErrorKind) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn map_app_err(self, layer: Layer, kind: ErrorKind) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static,
    {
        self.map_err(|e| AppError::new(layer, kind).with_inner(e))
    }
}

/// `Option<T>` を `AppResult<T>` に変換するための拡張トレイト
pub trait OptionExt<T> {
    /// `None` の場合に `AppError` を返す
    fn ok_or_app_err(self, layer: Layer, kind: ErrorKind) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_app_err(self, layer: Layer, kind: ErrorKind) -> AppResult<T> {
        self.ok_or_else(|| AppError::new(layer, kind))
    }
}

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

use crate::error::AppError;

/// The authenticated caller. Everything a user creates is owned by
/// `user_id`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthUser>().cloned();
        ready(user.ok_or_else(|| AppError::Unauthorized("Not authenticated".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn missing_user_is_unauthorized() {
        let (req, mut payload) = TestRequest::default().to_http_parts();
        let result = AuthUser::from_request(&req, &mut payload).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[actix_web::test]
    async fn user_is_read_from_extensions() {
        let (req, mut payload) = TestRequest::default().to_http_parts();
        req.extensions_mut().insert(AuthUser {
            user_id: 3,
            username: "taro".into(),
        });
        let user = AuthUser::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(user.user_id, 3);
    }
}

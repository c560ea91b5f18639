//! Session-expiry handling for the private scope.
//!
//! Wraps every authenticated route. A 401 coming out of the inner service
//! is rewritten depending on the caller: browser navigation gets a short
//! "session expired" page that forwards to the login form (carrying the
//! original location in `next`), while data requests get a JSON body they
//! can inspect.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::{Method, StatusCode, header};
use actix_web::{Error, HttpResponse};

pub struct RedirectUnauthorized;

impl<S, B> Transform<S, ServiceRequest> for RedirectUnauthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RedirectUnauthorizedMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectUnauthorizedMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RedirectUnauthorizedMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RedirectUnauthorizedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let browser_navigation = req.method() == Method::GET
            && req
                .headers()
                .get(header::ACCEPT)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|accept| accept.contains("text/html"));
        let next = match req.query_string() {
            "" => req.path().to_string(),
            query => format!("{}?{}", req.path(), query),
        };

        Box::pin(async move {
            let res = service.call(req).await?;

            if res.status() != StatusCode::UNAUTHORIZED {
                return Ok(res.map_into_left_body());
            }

            let (request, _) = res.into_parts();
            let response = if browser_navigation {
                session_expired_page(&next)
            } else {
                HttpResponse::Unauthorized()
                    .json(serde_json::json!({"detail": "Not authenticated"}))
            };
            Ok(ServiceResponse::new(request, response).map_into_right_body())
        })
    }
}

/// Login URL carrying the interrupted location.
pub fn login_redirect_url(next: &str) -> String {
    let query = serde_html_form::to_string([("next", next)]).unwrap_or_default();
    format!("/login?{query}")
}

fn session_expired_page(next: &str) -> HttpResponse {
    let login_url = login_redirect_url(next);
    let body = format!(
        "<!DOCTYPE html>\n\
         <html lang=\"ru\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta http-equiv=\"refresh\" content=\"2;url={login_url}\">\n\
         <title>Сессия истекла</title>\n\
         </head>\n\
         <body>\n\
         <p>Сессия истекла. Сейчас вы будете перенаправлены на страницу входа.</p>\n\
         <p><a href=\"{login_url}\">Войти сейчас</a></p>\n\
         </body>\n\
         </html>\n"
    );
    HttpResponse::Unauthorized()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

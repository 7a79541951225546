mod health_check;
mod helpers;
mod postgres;
mod subscribe;
mod subscribe_form;

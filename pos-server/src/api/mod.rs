//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录 / 当前用户
//! - [`tables`] - 桌台与桌台状态
//! - [`menu`] - 菜单管理
//! - [`orders`] - 订单、加菜、合计与收款
//! - [`payments`] - 支付记录查询
//! - [`kitchen`] - 厨房显示队列
//! - [`staff`] - 员工管理
//! - [`reports`] - 报表

pub mod auth;
pub mod health;
pub mod kitchen;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod reports;
pub mod staff;
pub mod tables;

pub use crate::utils::AppResult;

//! Status and payment enums for orders.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// These are the four values the application produces, in the order a
/// well-behaved order moves through them. The update operation deliberately
/// does NOT enforce that progression: any of the four may overwrite any
/// other (an operator can move an order backwards or skip steps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, awaiting handling.
    #[default]
    #[serde(rename = "Pedido Realizado")]
    Placed,
    /// Being prepared for shipment.
    #[serde(rename = "Em Preparação")]
    Preparing,
    /// Handed to the carrier.
    #[serde(rename = "Enviado")]
    Shipped,
    /// Delivered to the customer.
    #[serde(rename = "Entregue")]
    Delivered,
}

/// Error parsing an [`OrderStatus`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid order status: {0}")]
pub struct OrderStatusError(pub String);

impl OrderStatus {
    /// All statuses the application produces.
    pub const ALL: [Self; 4] = [Self::Placed, Self::Preparing, Self::Shipped, Self::Delivered];

    /// The status string stored in the `orders` table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "Pedido Realizado",
            Self::Preparing => "Em Preparação",
            Self::Shipped => "Enviado",
            Self::Delivered => "Entregue",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = OrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| OrderStatusError(s.to_owned()))
    }
}

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Pix,
    Boleto,
}

/// Error parsing a [`PaymentMethod`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid payment method: {0}")]
pub struct PaymentMethodError(pub String);

impl PaymentMethod {
    /// The wire/database value (snake_case).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Pix => "pix",
            Self::Boleto => "boleto",
        }
    }

    /// Human-readable Portuguese label for invoices and order views.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::CreditCard => "Cartão de Crédito",
            Self::DebitCard => "Cartão de Débito",
            Self::Pix => "PIX",
            Self::Boleto => "Boleto Bancário",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = PaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "pix" => Ok(Self::Pix),
            "boleto" => Ok(Self::Boleto),
            _ => Err(PaymentMethodError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_uses_portuguese_values() {
        let json = serde_json::to_string(&OrderStatus::Placed).unwrap();
        assert_eq!(json, "\"Pedido Realizado\"");

        let status: OrderStatus = serde_json::from_str("\"Em Preparação\"").unwrap();
        assert_eq!(status, OrderStatus::Preparing);
    }

    #[test]
    fn test_status_from_str_roundtrip() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_from_str_rejects_unknown() {
        assert!("Cancelado".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_payment_method_wire_values() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            "\"credit_card\""
        );
        let method: PaymentMethod = serde_json::from_str("\"boleto\"").unwrap();
        assert_eq!(method, PaymentMethod::Boleto);
    }

    #[test]
    fn test_payment_method_display_names() {
        assert_eq!(PaymentMethod::Pix.display_name(), "PIX");
        assert_eq!(PaymentMethod::Boleto.display_name(), "Boleto Bancário");
    }

    #[test]
    fn test_payment_method_from_str_rejects_unknown() {
        assert!("cash".parse::<PaymentMethod>().is_err());
    }
}

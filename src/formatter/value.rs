use snmp2::Value;

/// OID-префиксы, под которыми всегда лежат бинарные данные (MAC-адреса),
/// даже если байты случайно похожи на печатаемый текст
const BINARY_OID_PREFIXES: &[&str] = &[
    "1.3.6.1.2.1.2.2.1.6",  // ifPhysAddress
    "1.3.6.1.2.1.3.1.1.2",  // atPhysAddress
    "1.3.6.1.2.1.4.22.1.2", // ipNetToMediaPhysAddress
];

/// Отформатированное SNMP значение: имя типа плюс строковое представление
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedValue {
    pub type_name: &'static str,
    pub text: String,
}

/// Классификатор SNMP значений. Тотальная функция: для любой пары
/// (тип, payload) возвращает строку и никогда не падает
pub struct ValueFormatter;

impl ValueFormatter {
    /// Форматирует значение с учётом OID, по которому оно было прочитано
    pub fn format(oid: &str, value: &Value<'_>) -> FormattedValue {
        let text = match value {
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::OctetString(bytes) => Self::format_octet_string(oid, bytes),
            Value::Null => "null".to_string(),
            Value::ObjectIdentifier(o) => o.to_string(),
            Value::IpAddress(octets) => format!(
                "{}.{}.{}.{}",
                octets[0], octets[1], octets[2], octets[3]
            ),
            Value::Counter32(v) => v.to_string(),
            Value::Unsigned32(v) => v.to_string(),
            Value::Timeticks(v) => v.to_string(),
            Value::Opaque(bytes) => Self::bytes_to_hex(bytes),
            Value::Counter64(v) => v.to_string(),
            Value::EndOfMibView => "endOfMibView".to_string(),
            Value::NoSuchObject => "noSuchObject".to_string(),
            Value::NoSuchInstance => "noSuchInstance".to_string(),
            other => format!("{:?}", other),
        };

        FormattedValue {
            type_name: Self::type_name(value),
            text,
        }
    }

    /// Человекочитаемое имя типа. Нераспознанный тип — "Unknown", не ошибка
    pub fn type_name(value: &Value<'_>) -> &'static str {
        match value {
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::OctetString(_) => "OctetString",
            Value::Null => "Null",
            Value::ObjectIdentifier(_) => "OID",
            Value::IpAddress(_) => "IpAddress",
            Value::Counter32(_) => "Counter",
            Value::Unsigned32(_) => "Gauge",
            Value::Timeticks(_) => "TimeTicks",
            Value::Opaque(_) => "Opaque",
            Value::Counter64(_) => "Counter64",
            _ => "Unknown",
        }
    }

    /// OctetString: либо печатаемый текст, либо hex-представление
    pub fn format_octet_string(oid: &str, bytes: &[u8]) -> String {
        if Self::is_binary_payload(oid, bytes) {
            return Self::bytes_to_hex(bytes);
        }

        // Ошибка декодирования UTF-8 — сама по себе признак бинарных данных
        match std::str::from_utf8(bytes) {
            Ok(s) if Self::is_printable(s) => s.to_string(),
            _ => Self::bytes_to_hex(bytes),
        }
    }

    /// Бинарный payload: известный бинарный OID или ровно 6 байт (MAC)
    fn is_binary_payload(oid: &str, bytes: &[u8]) -> bool {
        if BINARY_OID_PREFIXES.iter().any(|p| oid.starts_with(p)) {
            return true;
        }
        bytes.len() == 6
    }

    /// Печатаемый ASCII (32..=126) плюс TAB, LF и CR
    fn is_printable(s: &str) -> bool {
        s.chars()
            .all(|c| matches!(c, ' '..='~' | '\t' | '\n' | '\r'))
    }

    /// 6 байт — через двоеточие как MAC-адрес, иначе сплошной hex с 0x
    fn bytes_to_hex(bytes: &[u8]) -> String {
        if bytes.len() == 6 {
            bytes
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(":")
        } else {
            let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
            format!("0x{}", hex)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_byte_payload_formats_as_mac() {
        let formatted = ValueFormatter::format(
            "1.3.6.1.2.1.1.1.0",
            &Value::OctetString(&[0x00, 0x1b, 0x44, 0x11, 0x3a, 0xb7]),
        );
        assert_eq!(formatted.type_name, "OctetString");
        assert_eq!(formatted.text, "00:1b:44:11:3a:b7");
        // пять двоеточий между шестью hex-парами
        assert_eq!(formatted.text.matches(':').count(), 5);
    }

    #[test]
    fn binary_oid_prefix_forces_hex_even_for_printable_bytes() {
        // "ABCDEFG" — печатаемо, но лежит под ifPhysAddress
        let text = ValueFormatter::format_octet_string("1.3.6.1.2.1.2.2.1.6.1", b"ABCDEFG");
        assert_eq!(text, "0x41424344454647");
    }

    #[test]
    fn printable_text_passes_through_verbatim() {
        let text =
            ValueFormatter::format_octet_string("1.3.6.1.2.1.1.1.0", b"HP LaserJet 4250\r\n");
        assert_eq!(text, "HP LaserJet 4250\r\n");
    }

    #[test]
    fn non_printable_payload_falls_back_to_hex() {
        let payload = [0x01, 0x02, 0xff, 0xfe];
        let text = ValueFormatter::format_octet_string("1.3.6.1.2.1.1.1.0", &payload);
        assert_eq!(text, "0x0102fffe");
        assert_eq!(text.len(), 2 + payload.len() * 2);
    }

    #[test]
    fn invalid_utf8_falls_back_to_hex() {
        let payload = [0xc3, 0x28, 0xa0, 0xa1, 0x00];
        let text = ValueFormatter::format_octet_string("1.3.6.1.2.1.1.5.0", &payload);
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 2 + payload.len() * 2);
    }

    #[test]
    fn scalar_types_render_canonically() {
        let cases = [
            (Value::Integer(-42), "Integer", "-42"),
            (Value::Counter32(1024), "Counter", "1024"),
            (Value::Unsigned32(7), "Gauge", "7"),
            (Value::Timeticks(123456), "TimeTicks", "123456"),
            (Value::Counter64(u64::MAX), "Counter64", "18446744073709551615"),
            (Value::Boolean(true), "Boolean", "true"),
            (Value::IpAddress([192, 168, 4, 73]), "IpAddress", "192.168.4.73"),
            (Value::Null, "Null", "null"),
        ];
        for (value, type_name, text) in cases {
            let formatted = ValueFormatter::format("1.3.6.1.2.1.1.3.0", &value);
            assert_eq!(formatted.type_name, type_name);
            assert_eq!(formatted.text, text);
        }
    }

    #[test]
    fn exception_values_map_to_unknown_without_panicking() {
        for value in [Value::EndOfMibView, Value::NoSuchObject, Value::NoSuchInstance] {
            let formatted = ValueFormatter::format("1.3.6.1.2.1.1.1.0", &value);
            assert_eq!(formatted.type_name, "Unknown");
            assert!(!formatted.text.is_empty());
        }
    }

    #[test]
    fn every_byte_payload_formats_without_panicking() {
        for len in 0..=16usize {
            let payload: Vec<u8> = (0..len as u8).map(|b| b.wrapping_mul(17)).collect();
            let text = ValueFormatter::format_octet_string("1.3.6.1.4.1.2385.1.1.19", &payload);
            assert!(!text.is_empty() || payload.is_empty());
        }
    }
}

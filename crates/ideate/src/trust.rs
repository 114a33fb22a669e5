//! Root certificates used to verify the Ideate gateway.
use rustls_pki_types::{pem::PemObject, CertificateDer};

use crate::error::{Error, Result};

/// A source of root certificates.
///
/// Implementations are asked for a fresh snapshot every time a channel is
/// created. [`NativeTrustStore`] is the only source used in production; the
/// trait exists so that channel construction can be exercised without the
/// host's certificate store.
pub trait TrustStore {
    /// Read the current set of trusted roots.
    ///
    /// # Errors
    /// Fails with [`Error::TrustStoreUnavailable`] if no roots can be read.
    fn load(&self) -> Result<TrustAnchor>;
}

/// Immutable snapshot of trusted root certificates.
#[derive(Debug, Clone, Default)]
pub struct TrustAnchor {
    anchors: Vec<rustls_pki_types::TrustAnchor<'static>>,
}

impl TrustAnchor {
    /// Build an anchor from DER encoded certificates.
    /// Certificates that cannot be used as a root are skipped.
    pub fn from_der<I, C>(certificates: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        let anchors = certificates
            .into_iter()
            .filter_map(|der| {
                let der = CertificateDer::from(der.as_ref());
                match webpki::anchor_from_trusted_cert(&der) {
                    Ok(anchor) => Some(anchor.to_owned()),
                    Err(e) => {
                        tracing::warn!("Skipping unusable root certificate: {e}");
                        None
                    }
                }
            })
            .collect();
        Self { anchors }
    }

    /// Build an anchor from a PEM bundle. The bundle may hold several certificates.
    ///
    /// # Errors
    /// Fails with [`Error::TrustStoreUnavailable`] if the bundle is not valid PEM.
    pub fn from_pem(bundle: impl AsRef<[u8]>) -> Result<Self> {
        let certificates = CertificateDer::pem_slice_iter(bundle.as_ref())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::TrustStoreUnavailable(format!("invalid PEM bundle: {e}")))?;
        Ok(Self::from_der(&certificates))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub(crate) fn into_anchors(self) -> Vec<rustls_pki_types::TrustAnchor<'static>> {
        self.anchors
    }
}

/// Trust store backed by the operating system's root certificates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeTrustStore;

impl TrustStore for NativeTrustStore {
    fn load(&self) -> Result<TrustAnchor> {
        let result = rustls_native_certs::load_native_certs();

        for error in &result.errors {
            tracing::warn!("Skipping unreadable native root certificate: {error}");
        }

        let anchor = TrustAnchor::from_der(&result.certs);
        if anchor.is_empty() {
            let reason = if result.errors.is_empty() {
                "no usable root certificates found".to_string()
            } else {
                result
                    .errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            tracing::error!("Failed to load native root certificates: {reason}");
            return Err(Error::TrustStoreUnavailable(reason));
        }

        tracing::trace!("Loaded {} native root certificates", anchor.len());
        Ok(anchor)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use pretty_assertions::assert_eq;

    use super::*;

    pub(crate) const ROOT_CA_PEM: &[u8] =
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/root_ca.pem"));
    pub(crate) const ROOT_CA_DER: &[u8] =
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/root_ca.der"));

    /// Trust store returning a fixed test root.
    #[derive(Debug, Clone, Copy)]
    pub(crate) struct FixtureTrustStore;

    impl TrustStore for FixtureTrustStore {
        fn load(&self) -> Result<TrustAnchor> {
            Ok(TrustAnchor::from_der([ROOT_CA_DER]))
        }
    }

    /// Trust store that always fails, as in a sandbox without `/etc/ssl`.
    #[derive(Debug, Clone, Copy)]
    pub(crate) struct UnavailableTrustStore;

    impl TrustStore for UnavailableTrustStore {
        fn load(&self) -> Result<TrustAnchor> {
            Err(Error::TrustStoreUnavailable("permission denied".to_string()))
        }
    }

    /// Trust store counting reads. Fails once `available_reads` reads were served.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct CountingTrustStore {
        pub(crate) loads: Arc<AtomicUsize>,
        pub(crate) available_reads: Option<usize>,
    }

    impl TrustStore for CountingTrustStore {
        fn load(&self) -> Result<TrustAnchor> {
            let previous = self.loads.fetch_add(1, Ordering::SeqCst);
            match self.available_reads {
                Some(available) if previous >= available => Err(Error::TrustStoreUnavailable(
                    "store removed".to_string(),
                )),
                _ => Ok(TrustAnchor::from_der([ROOT_CA_DER])),
            }
        }
    }

    #[test]
    fn test_from_pem_matches_from_der() {
        let from_pem = TrustAnchor::from_pem(ROOT_CA_PEM).unwrap();
        let from_der = TrustAnchor::from_der([ROOT_CA_DER]);
        assert_eq!(from_pem.len(), 1);
        assert_eq!(from_pem.into_anchors(), from_der.into_anchors());
    }

    #[test]
    fn test_from_der_skips_unusable_certificates() {
        let anchor = TrustAnchor::from_der([ROOT_CA_DER, b"not a certificate".as_slice()]);
        assert_eq!(anchor.len(), 1);
    }

    #[test]
    fn test_from_pem_rejects_broken_bundle() {
        let bundle = b"-----BEGIN CERTIFICATE-----\n!!!!\n-----END CERTIFICATE-----\n";
        assert!(matches!(
            TrustAnchor::from_pem(bundle),
            Err(Error::TrustStoreUnavailable(_))
        ));
    }

    #[test]
    fn test_native_store_never_returns_empty_anchor() {
        match NativeTrustStore.load() {
            Ok(anchor) => assert!(!anchor.is_empty()),
            Err(e) => assert!(matches!(e, Error::TrustStoreUnavailable(_))),
        }
    }
}

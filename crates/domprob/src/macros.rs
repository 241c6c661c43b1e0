//! Static announcement declaration.

/// Expands an optional `required` flag, which defaults to `false`.
#[doc(hidden)]
#[macro_export]
macro_rules! __announcement_required {
	() => {
		false
	};
	($required:literal) => {
		$required
	};
}

/// Declares an announcement method on an observation type.
///
/// Each entry in the bracket list records one requirement, in order. A bare
/// type is optional; `Type: true` makes it required. The handler receives the
/// observation and the instrument the dispatcher resolved for that entry.
///
/// ```ignore
/// announcement!(OrderPlaced, log, [Logger: true, Metrics], |order, instrument| {
///     tracing::info!(?instrument, id = order.id, "order placed");
/// });
/// ```
///
/// Annotating the instrument parameter downcasts it first, failing the
/// announcement if the resolved instrument has another type:
///
/// ```ignore
/// announcement!(OrderPlaced, log, [Logger: true], |order, logger: &Logger| {
///     logger.info(format_args!("order {} placed", order.id));
/// });
/// ```
#[macro_export]
macro_rules! announcement {
	($obs:ident, $name:ident, [$($kind:ty $(: $required:literal)?),* $(,)?], |$o:ident, $inst:ident : &$ity:ty| $body:expr) => {
		$crate::announcement!($obs, $name, [$($kind $(: $required)?),*], |$o, __instrument| {
			let $inst: &$ity = match __instrument.downcast_ref::<$ity>() {
				::core::option::Option::Some(inst) => inst,
				::core::option::Option::None => {
					return ::core::result::Result::Err($crate::__private::anyhow::anyhow!(
						"instrument {:?} is not a `{}`",
						__instrument,
						::core::stringify!($ity),
					));
				}
			};
			$body
		});
	};
	($obs:ident, $name:ident, [$($kind:ty $(: $required:literal)?),* $(,)?], |$o:ident, $inst:ident| $body:expr) => {
		$crate::__private::paste::paste! {
			#[allow(non_snake_case)]
			fn [<__announce_ $obs _ $name>](
				receiver: &dyn ::core::any::Any,
				$inst: &dyn $crate::Instrument,
			) -> $crate::__private::anyhow::Result<()> {
				let ::core::option::Option::Some($o) = receiver.downcast_ref::<$obs>() else {
					return ::core::result::Result::Err($crate::__private::anyhow::anyhow!(
						"receiver is not a `{}`",
						::core::stringify!($obs),
					));
				};
				$crate::IntoOutcome::into_outcome({ $body })
			}

			#[allow(non_upper_case_globals)]
			static [<__ANNOUNCEMENT_ $obs _ $name>]: $crate::observation::AnnouncementStatic =
				$crate::observation::AnnouncementStatic {
					observation: $crate::ObservationKey::of::<$obs>,
					name: ::core::stringify!($name),
					requirements: &[$(
						$crate::observation::RequirementStatic {
							kind: $crate::InstrumentKind::of::<$kind>,
							required: $crate::__announcement_required!($($required)?),
						}
					),*],
					handler: [<__announce_ $obs _ $name>],
				};

			$crate::__private::inventory::submit!($crate::observation::AnnouncementReg(&[<__ANNOUNCEMENT_ $obs _ $name>]));
		}
	};
}
